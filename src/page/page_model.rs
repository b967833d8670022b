use std::cell::OnceCell;
use std::rc::Rc;

use serde_json::Value;

use crate::driver::driver_model::ElementHandle;
use crate::driver::session::Session;
use crate::error::{PageError, ViewStateError};
use crate::metadata::decl_model::{NavigationIdentity, TypeRef};
use crate::page::core::ComponentCore;
use crate::page::{resolver, transition};
use crate::trace::trace::TraceEvent;

/// A node of the page-object tree. Provides the element-finding capability
/// scoped to the node, and the state-verification chain that every shortcut
/// or action access walks before any element lookup.
pub trait Component {
    fn session(&self) -> &Session;

    fn page_type(&self) -> &TypeRef;

    /// Verify that the browser is in the state this node declares. Nested
    /// components delegate up the parent chain; the owning page object
    /// terminates the chain with the concrete identity check.
    fn check_state(&self) -> Result<(), PageError>;

    /// Find the first matching element under this node's scope.
    fn find_element(&self, strategy: &str, selector: &str) -> Result<ElementHandle, PageError>;

    /// Find all matching elements under this node's scope.
    fn find_elements(&self, strategy: &str, selector: &str)
    -> Result<Vec<ElementHandle>, PageError>;
}

// ============================================================================
// PageObject
// ============================================================================

/// A root node: bound directly to the session, scoped to the whole document,
/// owner of the navigation identity. The state-verification chain of every
/// component nested below it terminates here.
///
/// Cloning is cheap and preserves instance identity (memoized metadata and
/// resolved elements are shared), which is what lets the transition resolver
/// hand back "this same page" for actions that stay on the current page.
#[derive(Clone)]
pub struct PageObject {
    core: Rc<ComponentCore>,
}

impl std::fmt::Debug for PageObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageObject")
            .field("type", &self.core.ty.name())
            .finish_non_exhaustive()
    }
}

impl PageObject {
    /// A page object never has a parent; it is its own chain terminator.
    pub fn new(session: Session, ty: TypeRef) -> Self {
        PageObject {
            core: Rc::new(ComponentCore::new(session, ty)),
        }
    }

    /// Navigate the browser to this page's declared identity. Returns the
    /// instance for chaining.
    pub fn navigate(&self) -> Result<&Self, PageError> {
        let table = self.core.table();
        match table.identity() {
            Some(NavigationIdentity::Url(url)) => self.core.session.navigate_to(url)?,
            Some(NavigationIdentity::Route { name, parameters }) => {
                self.core.session.navigate_to_route(name, parameters)?
            }
            None => return Err(self.missing_identity()),
        }
        Ok(self)
    }

    /// Resolve a non-collection shortcut to its element.
    pub fn element(&self, name: &str) -> Result<ElementHandle, PageError> {
        resolver::resolve_single(self, &self.core, name)
    }

    /// Resolve a collection shortcut to its elements.
    pub fn elements(&self, name: &str) -> Result<Vec<ElementHandle>, PageError> {
        resolver::resolve_many(self, &self.core, name)
    }

    /// Dispatch a declared action method and return the verified destination
    /// page.
    pub fn invoke_action(&self, name: &str, args: &[Value]) -> Result<PageObject, PageError> {
        transition::dispatch(self, &self.core, Some(self), name, args)
    }

    /// Set the value of the element behind a shortcut. Not a navigating
    /// action; the page stays current.
    pub fn fill(&self, name: &str, value: Value) -> Result<&Self, PageError> {
        resolver::fill(self, &self.core, name, value)?;
        Ok(self)
    }

    /// `fill` for each pair, in order.
    pub fn fill_all<'a, I>(&self, values: I) -> Result<&Self, PageError>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        for (name, value) in values {
            self.fill(name, value)?;
        }
        Ok(self)
    }

    fn verify_identity(&self) -> Result<(), PageError> {
        let table = self.core.table();
        match table.identity() {
            Some(NavigationIdentity::Url(expected)) => {
                let actual = self.core.session.current_url()?;
                if actual != *expected {
                    return Err(ViewStateError::UrlMismatch {
                        page: table.type_name().to_string(),
                        expected: expected.clone(),
                        actual,
                    }
                    .into());
                }
                Ok(())
            }
            Some(NavigationIdentity::Route { name, parameters }) => {
                let request = self.core.session.app_request()?;
                if request.route_name != *name {
                    return Err(ViewStateError::RouteMismatch {
                        page: table.type_name().to_string(),
                        expected: name.clone(),
                        actual: request.route_name,
                    }
                    .into());
                }
                for (parameter, expected) in parameters {
                    let actual = request.parameters.get(parameter);
                    if actual.map(String::as_str) != Some(expected.as_str()) {
                        return Err(ViewStateError::RouteParamMismatch {
                            page: table.type_name().to_string(),
                            parameter: parameter.clone(),
                            expected: expected.clone(),
                            actual: actual.cloned(),
                        }
                        .into());
                    }
                }
                Ok(())
            }
            None => Err(self.missing_identity()),
        }
    }

    fn missing_identity(&self) -> PageError {
        PageError::Metadata {
            type_name: self.core.ty.name().to_string(),
            detail: "no navigation identity (url or route) declared".to_string(),
        }
    }
}

impl Component for PageObject {
    fn session(&self) -> &Session {
        &self.core.session
    }

    fn page_type(&self) -> &TypeRef {
        &self.core.ty
    }

    fn check_state(&self) -> Result<(), PageError> {
        let result = self.verify_identity();
        self.core.session.trace(&TraceEvent::StateChecked {
            page: self.core.ty.name().to_string(),
            outcome: match &result {
                Ok(()) => "ok".to_string(),
                Err(e) => e.to_string(),
            },
        });
        result
    }

    fn find_element(&self, strategy: &str, selector: &str) -> Result<ElementHandle, PageError> {
        self.core.session.find_element(strategy, selector)
    }

    fn find_elements(
        &self,
        strategy: &str,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, PageError> {
        self.core.session.find_elements(strategy, selector)
    }
}

// ============================================================================
// PageComponent
// ============================================================================

/// A nested region of a page. Scope and state verification both come from
/// the parent: the component is valid exactly when its enclosing chain up to
/// the owning page object is valid.
pub struct PageComponent {
    core: ComponentCore,
    parent: Rc<dyn Component>,
}

impl std::fmt::Debug for PageComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageComponent")
            .field("type", &self.core.ty.name())
            .finish_non_exhaustive()
    }
}

impl PageComponent {
    pub fn new(
        session: Session,
        ty: TypeRef,
        parent: Option<Rc<dyn Component>>,
    ) -> Result<Self, PageError> {
        let parent = parent.ok_or_else(|| {
            PageError::InvalidArgument(format!("a PageComponent needs a parent ('{}')", ty.name()))
        })?;
        Ok(PageComponent {
            core: ComponentCore::new(session, ty),
            parent,
        })
    }

    pub fn element(&self, name: &str) -> Result<ElementHandle, PageError> {
        resolver::resolve_single(self, &self.core, name)
    }

    pub fn elements(&self, name: &str) -> Result<Vec<ElementHandle>, PageError> {
        resolver::resolve_many(self, &self.core, name)
    }

    pub fn invoke_action(&self, name: &str, args: &[Value]) -> Result<PageObject, PageError> {
        transition::dispatch(self, &self.core, None, name, args)
    }

    pub fn fill(&self, name: &str, value: Value) -> Result<&Self, PageError> {
        resolver::fill(self, &self.core, name, value)?;
        Ok(self)
    }

    pub fn fill_all<'a, I>(&self, values: I) -> Result<&Self, PageError>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        for (name, value) in values {
            self.fill(name, value)?;
        }
        Ok(self)
    }
}

impl Component for PageComponent {
    fn session(&self) -> &Session {
        &self.core.session
    }

    fn page_type(&self) -> &TypeRef {
        &self.core.ty
    }

    fn check_state(&self) -> Result<(), PageError> {
        self.parent.check_state()
    }

    fn find_element(&self, strategy: &str, selector: &str) -> Result<ElementHandle, PageError> {
        self.parent.find_element(strategy, selector)
    }

    fn find_elements(
        &self,
        strategy: &str,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, PageError> {
        self.parent.find_elements(strategy, selector)
    }
}

// ============================================================================
// ElementComponent
// ============================================================================

/// How an element component locates its scope root.
pub enum RootSpec {
    /// A pre-resolved element, used as-is.
    Element(ElementHandle),
    /// Resolved through the parent's finder on first use.
    Selector { strategy: String, selector: String },
}

/// Construction parameters of an [`ElementComponent`]: the root binding,
/// optional expectations validated against the resolved root, and an
/// optional criteria-rewriting hook applied to every lookup issued through
/// the component.
pub struct ComponentParams {
    pub root: RootSpec,
    pub expected_tag: Option<String>,
    pub expected_attributes: Vec<(String, String)>,
    pub rewrite_criteria: Option<fn(&str, &str) -> (String, String)>,
}

impl ComponentParams {
    pub fn selector(strategy: impl Into<String>, selector: impl Into<String>) -> Self {
        ComponentParams {
            root: RootSpec::Selector {
                strategy: strategy.into(),
                selector: selector.into(),
            },
            expected_tag: None,
            expected_attributes: Vec::new(),
            rewrite_criteria: None,
        }
    }

    pub fn element(element: ElementHandle) -> Self {
        ComponentParams {
            root: RootSpec::Element(element),
            expected_tag: None,
            expected_attributes: Vec::new(),
            rewrite_criteria: None,
        }
    }

    pub fn expected_tag(mut self, tag: impl Into<String>) -> Self {
        self.expected_tag = Some(tag.into());
        self
    }

    pub fn expected_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.expected_attributes.push((name.into(), value.into()));
        self
    }

    pub fn rewrite_criteria(mut self, rewrite: fn(&str, &str) -> (String, String)) -> Self {
        self.rewrite_criteria = Some(rewrite);
        self
    }
}

/// A component whose own scope root is a resolved element, enabling
/// composable sub-regions nested arbitrarily deep. The root is resolved at
/// most once per instance and validated against the declared expectations;
/// a mismatch names the component's type, not a shortcut.
pub struct ElementComponent {
    core: ComponentCore,
    parent: Rc<dyn Component>,
    params: ComponentParams,
    root: OnceCell<ElementHandle>,
}

impl ElementComponent {
    pub fn new(
        session: Session,
        ty: TypeRef,
        parent: Rc<dyn Component>,
        params: ComponentParams,
    ) -> Self {
        ElementComponent {
            core: ComponentCore::new(session, ty),
            parent,
            params,
            root: OnceCell::new(),
        }
    }

    /// The component's scope root, resolved and validated on first use.
    pub fn root(&self) -> Result<ElementHandle, PageError> {
        if let Some(element) = self.root.get() {
            return Ok(element.clone());
        }
        let element = match &self.params.root {
            RootSpec::Element(element) => element.clone(),
            RootSpec::Selector { strategy, selector } => {
                self.parent.find_element(strategy, selector)?
            }
        };
        resolver::check_tag_and_attributes(
            &element,
            self.core.ty.name(),
            self.params.expected_tag.as_deref(),
            &self.params.expected_attributes,
        )?;
        let _ = self.root.set(element.clone());
        Ok(element)
    }

    pub fn element(&self, name: &str) -> Result<ElementHandle, PageError> {
        resolver::resolve_single(self, &self.core, name)
    }

    pub fn elements(&self, name: &str) -> Result<Vec<ElementHandle>, PageError> {
        resolver::resolve_many(self, &self.core, name)
    }

    pub fn invoke_action(&self, name: &str, args: &[Value]) -> Result<PageObject, PageError> {
        transition::dispatch(self, &self.core, None, name, args)
    }

    pub fn fill(&self, name: &str, value: Value) -> Result<&Self, PageError> {
        resolver::fill(self, &self.core, name, value)?;
        Ok(self)
    }

    pub fn fill_all<'a, I>(&self, values: I) -> Result<&Self, PageError>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        for (name, value) in values {
            self.fill(name, value)?;
        }
        Ok(self)
    }

    fn rewrite(&self, strategy: &str, selector: &str) -> (String, String) {
        match self.params.rewrite_criteria {
            Some(rewrite) => rewrite(strategy, selector),
            None => (strategy.to_string(), selector.to_string()),
        }
    }
}

impl Component for ElementComponent {
    fn session(&self) -> &Session {
        &self.core.session
    }

    fn page_type(&self) -> &TypeRef {
        &self.core.ty
    }

    fn check_state(&self) -> Result<(), PageError> {
        self.parent.check_state()
    }

    fn find_element(&self, strategy: &str, selector: &str) -> Result<ElementHandle, PageError> {
        let (strategy, selector) = self.rewrite(strategy, selector);
        self.root()?.find_element(&strategy, &selector)
    }

    fn find_elements(
        &self,
        strategy: &str,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, PageError> {
        let (strategy, selector) = self.rewrite(strategy, selector);
        self.root()?.find_elements(&strategy, &selector)
    }
}
