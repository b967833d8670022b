pub(crate) mod core;
pub mod page_model;
pub(crate) mod resolver;
pub(crate) mod transition;
