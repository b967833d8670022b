use std::fmt;

/// Errors raised by the page-object core.
///
/// Everything propagates to the caller uncaught; the only internal recovery
/// is the transition resolver's candidate loop, which discards `ViewState`
/// errors while candidates remain.
#[derive(Debug, Clone, PartialEq)]
pub enum PageError {
    /// The browser is not in the expected page/element state.
    ViewState(ViewStateError),

    /// A required single-element shortcut resolved to zero elements.
    ElementNotFound { strategy: String, selector: String },

    /// Malformed or inconsistent declarative metadata, surfaced lazily at
    /// first use of the offending entry.
    Metadata { type_name: String, detail: String },

    /// Dispatch of an action or shortcut name the type does not declare.
    UnsupportedOperation { type_name: String, name: String },

    /// Structural misuse (component without a parent, action dispatched
    /// against a collection shortcut).
    InvalidArgument(String),

    /// A session/driver collaborator command failed.
    Session { command: String, detail: String },
}

/// Mismatch between a declared identity and the browser's actual state.
///
/// Carries enough context (type name, shortcut/attribute name, expected vs.
/// actual) to diagnose without re-running the test.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewStateError {
    UrlMismatch {
        page: String,
        expected: String,
        actual: String,
    },
    RouteMismatch {
        page: String,
        expected: String,
        actual: String,
    },
    RouteParamMismatch {
        page: String,
        parameter: String,
        expected: String,
        /// None when the routed request carries no such parameter.
        actual: Option<String>,
    },
    TagMismatch {
        /// `DefiningType::shortcut`, `DefiningType::shortcut[index]` for
        /// collections, or the component type name for a root element.
        subject: String,
        expected: String,
        actual: String,
    },
    AttributeMismatch {
        subject: String,
        attribute: String,
        expected: String,
        /// None when the element has no such attribute.
        actual: Option<String>,
    },
}

impl fmt::Display for ViewStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewStateError::UrlMismatch {
                page,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "{}: URL '{}' was expected, actual URL is '{}'",
                    page, expected, actual
                )
            }
            ViewStateError::RouteMismatch {
                page,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "{}: route '{}' was expected, actual route is '{}'",
                    page, expected, actual
                )
            }
            ViewStateError::RouteParamMismatch {
                page,
                parameter,
                expected,
                actual,
            } => match actual {
                Some(actual) => write!(
                    f,
                    "{}: parameter '{}' is expected to be '{}', but is '{}'",
                    page, parameter, expected, actual
                ),
                None => write!(
                    f,
                    "{}: parameter '{}' is expected to be '{}', but is missing",
                    page, parameter, expected
                ),
            },
            ViewStateError::TagMismatch {
                subject,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "element '{}' is expected to be a tag '{}', but is '{}'",
                    subject, expected, actual
                )
            }
            ViewStateError::AttributeMismatch {
                subject,
                attribute,
                expected,
                actual,
            } => match actual {
                Some(actual) => write!(
                    f,
                    "expected value of '{}' is '{}' on element '{}', actual value is '{}'",
                    attribute, expected, subject, actual
                ),
                None => write!(
                    f,
                    "expected value of '{}' is '{}' on element '{}', but the attribute is missing",
                    attribute, expected, subject
                ),
            },
        }
    }
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::ViewState(e) => write!(f, "Unexpected view state: {}", e),
            PageError::ElementNotFound { strategy, selector } => {
                write!(f, "No element found for {}={}", strategy, selector)
            }
            PageError::Metadata { type_name, detail } => {
                write!(f, "Metadata error in '{}': {}", type_name, detail)
            }
            PageError::UnsupportedOperation { type_name, name } => {
                write!(f, "'{}' does not declare '{}'", type_name, name)
            }
            PageError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            PageError::Session { command, detail } => {
                write!(f, "Session command '{}' failed: {}", command, detail)
            }
        }
    }
}

impl std::error::Error for ViewStateError {}

impl std::error::Error for PageError {}

impl From<ViewStateError> for PageError {
    fn from(e: ViewStateError) -> Self {
        PageError::ViewState(e)
    }
}
