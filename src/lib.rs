//! Metadata-driven page objects for browser UI test automation.
//!
//! A page or component type is declared as structured metadata (element
//! "shortcuts", action "methods" and a navigation identity), either with the
//! [`metadata::decl_model::PageTypeDef`] builder or in a YAML catalog
//! ([`schema`]). At run time the framework compiles the declarations once
//! per type (merged across the type's ancestor chain), resolves shortcuts
//! into live, validated elements on demand, and dispatches action methods:
//! invoke an operation on the target element, then verify which of the
//! declared candidate destination pages the browser actually landed on.
//!
//! Every shortcut or action access first verifies the component's declared
//! state (`check_state`), recursively up the parent chain, so stale
//! components fail fast instead of acting on the wrong page.
//!
//! The browser itself is a collaborator behind the [`driver::driver_model`]
//! traits; the core orchestrates when and under which scope lookups happen,
//! never how.

pub mod cli;
pub mod driver;
pub mod error;
pub mod metadata;
pub mod page;
pub mod schema;
pub mod trace;
