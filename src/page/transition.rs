use std::rc::Rc;

use serde_json::Value;

use crate::error::PageError;
use crate::page::core::ComponentCore;
use crate::page::page_model::{Component, PageObject};
use crate::page::resolver;
use crate::trace::trace::TraceEvent;

/// Action-method dispatch: invoke the declared operation on the element
/// behind the action's target shortcut, wait for the document to settle,
/// then determine which candidate destination type now matches the browser.
///
/// Candidates are tried in declared order; the first whose `check_state`
/// succeeds wins and later candidates are never tried. A `ViewState` failure
/// moves on to the next candidate; this is the sole place the core swallows
/// an error, and only that kind. When every candidate fails, the last
/// `ViewState` error propagates.
///
/// `current` is the dispatching instance when it is itself a page object;
/// if its runtime type is the candidate, it is reused as-is, preserving
/// identity and any already-resolved state.
pub(crate) fn dispatch(
    node: &dyn Component,
    core: &ComponentCore,
    current: Option<&PageObject>,
    action_name: &str,
    args: &[Value],
) -> Result<PageObject, PageError> {
    let table = core.table();
    let action = match table.action(action_name) {
        Some(action) => action.clone(),
        None => {
            return Err(PageError::UnsupportedOperation {
                type_name: table.type_name().to_string(),
                name: action_name.to_string(),
            });
        }
    };

    // An action naming a shortcut nothing in the chain declares is a
    // metadata defect, not an unsupported operation.
    let def = match table.shortcut(&action.shortcut) {
        Some(Ok(def)) => def.clone(),
        Some(Err(e)) => return Err(e),
        None => {
            return Err(PageError::Metadata {
                type_name: table.type_name().to_string(),
                detail: format!(
                    "action '{}' targets undeclared shortcut '{}'",
                    action_name, action.shortcut
                ),
            });
        }
    };
    if def.collection {
        return Err(PageError::InvalidArgument(format!(
            "action '{}' of '{}' targets collection shortcut '{}'",
            action_name,
            table.type_name(),
            action.shortcut
        )));
    }

    node.check_state()?;
    let element = resolver::resolve_single_checked(node, core, &action.shortcut, &def)?;
    element.call(&action.operation, args)?;

    let session = node.session();
    session.wait_for_document()?;
    session.trace(&TraceEvent::ActionDispatched {
        page: core.ty.name().to_string(),
        action: action_name.to_string(),
        operation: action.operation.clone(),
    });

    let mut last_mismatch: Option<PageError> = None;
    for (attempt, destination) in action.destinations.iter().enumerate() {
        let ty = session.registry().resolve(destination)?;
        let candidate = match current {
            Some(page) if Rc::ptr_eq(page.page_type(), &ty) => page.clone(),
            _ => PageObject::new(session.clone(), ty),
        };
        match candidate.check_state() {
            Ok(()) => {
                session.trace(&TraceEvent::TransitionResolved {
                    action: action_name.to_string(),
                    destination: destination.clone(),
                    attempts: attempt + 1,
                });
                return Ok(candidate);
            }
            Err(e @ PageError::ViewState(_)) => last_mismatch = Some(e),
            Err(e) => return Err(e),
        }
    }

    match last_mismatch {
        Some(e) => Err(e),
        None => Err(PageError::Metadata {
            type_name: table.type_name().to_string(),
            detail: format!("action '{}' declares no destination types", action_name),
        }),
    }
}
