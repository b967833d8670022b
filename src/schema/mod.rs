pub mod loader;
pub mod schema_model;
