use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use serde_json::Value;

use crate::error::PageError;

/// A live element handle. Shared freely inside one session; the model is
/// single-threaded, so `Rc` is enough.
pub type ElementHandle = Rc<dyn Element>;

/// Result of routing a browser URL back into a logical application request.
#[derive(Debug, Clone, PartialEq)]
pub struct AppRequest {
    pub route_name: String,
    pub parameters: BTreeMap<String, String>,
}

/// A resolved element as exposed by the underlying WebDriver transport.
///
/// Besides the inspection methods, an element carries an open set of named
/// operations (click, set_value, ...) invoked by name with positional
/// arguments, and serves as a lookup scope for nested finds.
pub trait Element: std::fmt::Debug {
    fn tag_name(&self) -> Result<String, PageError>;

    /// Value of the named attribute, or `None` when the element has no such
    /// attribute.
    fn attribute(&self, name: &str) -> Result<Option<String>, PageError>;

    /// Invoke a named operation with positional arguments. The operation set
    /// is driver-defined and opaque to the core.
    fn call(&self, operation: &str, args: &[Value]) -> Result<Value, PageError>;

    /// Find the first element under this element matching the criteria.
    /// Fails with `ElementNotFound` when nothing matches.
    fn find_element(&self, strategy: &str, selector: &str) -> Result<ElementHandle, PageError>;

    /// Find all elements under this element matching the criteria. An empty
    /// vector is a valid result.
    fn find_elements(&self, strategy: &str, selector: &str)
    -> Result<Vec<ElementHandle>, PageError>;
}

/// The browser-driving collaborator. The core never talks HTTP or selector
/// engines itself; it only decides when and under which scope a lookup
/// happens.
pub trait WebDriver {
    /// Find the first matching element in the whole document. Fails with
    /// `ElementNotFound` when nothing matches; when several match, the first
    /// one is the result.
    fn find_element(&self, strategy: &str, selector: &str) -> Result<ElementHandle, PageError>;

    /// Find all matching elements in the whole document.
    fn find_elements(&self, strategy: &str, selector: &str)
    -> Result<Vec<ElementHandle>, PageError>;

    fn current_url(&self) -> Result<String, PageError>;

    /// Route a browser URL back into a logical application request.
    fn route_url(&self, url: &str) -> Result<AppRequest, PageError>;

    fn navigate_to(&self, url: &str) -> Result<(), PageError>;

    fn navigate_to_route(
        &self,
        route_name: &str,
        parameters: &BTreeMap<String, String>,
    ) -> Result<(), PageError>;

    /// Block until the document reaches a stable/loaded condition. Polling
    /// and timeout policy belong to the driver, not to the core.
    fn wait_for_document_ready(&self, timeout: Duration) -> Result<(), PageError>;
}
