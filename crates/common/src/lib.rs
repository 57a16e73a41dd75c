//! Shared building blocks for the blog service crates:
//! logging setup, Prometheus metrics and small response types used by
//! more than one crate.

pub mod types;
pub mod utils;
pub mod metrics;
