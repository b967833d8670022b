pub mod driver_model;
pub mod session;
