pub mod compiler;
pub mod decl_model;
pub mod registry;
