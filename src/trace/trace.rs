use serde::Serialize;

/// One line of the JSONL trace: what the framework did against the browser
/// and what it concluded. The logger stamps each event with a timestamp.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// The session was told to load a URL or a route.
    Navigate { target: String },

    /// A page object's terminal state check ran.
    StateChecked { page: String, outcome: String },

    /// A shortcut resolved to live elements (fresh lookups only, not
    /// memoized re-reads).
    ShortcutResolved {
        page: String,
        shortcut: String,
        count: usize,
    },

    /// An action method invoked its operation on the target element.
    ActionDispatched {
        page: String,
        action: String,
        operation: String,
    },

    /// The candidate loop settled on a destination page.
    TransitionResolved {
        action: String,
        destination: String,
        attempts: usize,
    },
}
