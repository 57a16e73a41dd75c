//! Data model shared by the service and HTTP layers.

pub mod errors;
pub mod blog;
