//! Service layer for blog content.
//! - `store`: persistence and id allocation behind the `BlogStore` trait.
//! - `blog`: validation and orchestration on top of a store.
//! - `errors`: error kinds surfaced to the HTTP boundary.

pub mod errors;
pub mod store;
pub mod blog;
#[cfg(test)]
pub mod test_support;
