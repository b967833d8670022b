use serde_json::Value;

use crate::driver::driver_model::ElementHandle;
use crate::error::{PageError, ViewStateError};
use crate::metadata::compiler::ShortcutDef;
use crate::page::core::ComponentCore;
use crate::page::page_model::Component;
use crate::trace::trace::TraceEvent;

/// Operation invoked on the target element by `fill`.
pub(crate) const SET_VALUE: &str = "set_value";

/// Resolve a non-collection shortcut to one element.
///
/// The component's state is verified first; a shortcut never resolves
/// against a page that does not match its declared identity. The resolved
/// element is memoized per instance, so a repeated access re-verifies state
/// but performs no second driver lookup.
pub(crate) fn resolve_single(
    node: &dyn Component,
    core: &ComponentCore,
    name: &str,
) -> Result<ElementHandle, PageError> {
    node.check_state()?;
    let def = lookup(core, name)?;
    if def.collection {
        return Err(PageError::InvalidArgument(format!(
            "shortcut '{}' of '{}' is a collection, use elements()",
            name,
            core.table().type_name()
        )));
    }
    resolve_single_checked(node, core, name, &def)
}

/// Resolve a collection shortcut to a sequence of elements. An empty
/// sequence is a valid, non-error result. Every element is validated
/// individually; the index of a failing element appears in the error.
pub(crate) fn resolve_many(
    node: &dyn Component,
    core: &ComponentCore,
    name: &str,
) -> Result<Vec<ElementHandle>, PageError> {
    node.check_state()?;
    let def = lookup(core, name)?;
    if !def.collection {
        return Err(PageError::InvalidArgument(format!(
            "shortcut '{}' of '{}' is a single element, use element()",
            name,
            core.table().type_name()
        )));
    }

    let elements = node.find_elements(&def.strategy, &def.selector)?;
    for (index, element) in elements.iter().enumerate() {
        check_tag_and_attributes(
            element,
            &def.subject(name, Some(index)),
            def.expected_tag.as_deref(),
            &def.expected_attributes,
        )?;
    }
    core.session.trace(&TraceEvent::ShortcutResolved {
        page: core.ty.name().to_string(),
        shortcut: name.to_string(),
        count: elements.len(),
    });
    Ok(elements)
}

/// Single-element resolution for a caller that already verified state and
/// holds the compiled definition (the dispatch path).
pub(crate) fn resolve_single_checked(
    node: &dyn Component,
    core: &ComponentCore,
    name: &str,
    def: &ShortcutDef,
) -> Result<ElementHandle, PageError> {
    if let Some(element) = core.resolved.borrow().get(name) {
        return Ok(element.clone());
    }

    // The driver reports the first match when several elements match.
    let element = node.find_element(&def.strategy, &def.selector)?;
    check_tag_and_attributes(
        &element,
        &def.subject(name, None),
        def.expected_tag.as_deref(),
        &def.expected_attributes,
    )?;
    core.resolved
        .borrow_mut()
        .insert(name.to_string(), element.clone());
    core.session.trace(&TraceEvent::ShortcutResolved {
        page: core.ty.name().to_string(),
        shortcut: name.to_string(),
        count: 1,
    });
    Ok(element)
}

/// Shortcut-mutation dispatch: set the value of the element behind a
/// shortcut. Resolve-then-invoke only: no document wait, no destination
/// resolution; the current component stays current.
pub(crate) fn fill(
    node: &dyn Component,
    core: &ComponentCore,
    name: &str,
    value: Value,
) -> Result<(), PageError> {
    let element = resolve_single(node, core, name)?;
    element.call(SET_VALUE, &[value])?;
    Ok(())
}

fn lookup(core: &ComponentCore, name: &str) -> Result<ShortcutDef, PageError> {
    let table = core.table();
    match table.shortcut(name) {
        Some(Ok(def)) => Ok(def.clone()),
        Some(Err(e)) => Err(e),
        None => Err(PageError::UnsupportedOperation {
            type_name: table.type_name().to_string(),
            name: name.to_string(),
        }),
    }
}

/// Validate a resolved element against expectations. Tag names compare
/// case-sensitively; attributes compare in declaration order and a missing
/// attribute counts as a mismatch.
pub(crate) fn check_tag_and_attributes(
    element: &ElementHandle,
    subject: &str,
    expected_tag: Option<&str>,
    expected_attributes: &[(String, String)],
) -> Result<(), PageError> {
    if let Some(expected) = expected_tag {
        let actual = element.tag_name()?;
        if actual != expected {
            return Err(ViewStateError::TagMismatch {
                subject: subject.to_string(),
                expected: expected.to_string(),
                actual,
            }
            .into());
        }
    }
    for (attribute, expected) in expected_attributes {
        let actual = element.attribute(attribute)?;
        if actual.as_deref() != Some(expected.as_str()) {
            return Err(ViewStateError::AttributeMismatch {
                subject: subject.to_string(),
                attribute: attribute.clone(),
                expected: expected.clone(),
                actual,
            }
            .into());
        }
    }
    Ok(())
}
