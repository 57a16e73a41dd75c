//! Blog use-cases: validation in front of a [`crate::store::BlogStore`].

pub mod service;

pub use service::{BlogPolicy, BlogService};
