use std::path::PathBuf;
use std::sync::Arc;

use crate::blog::{BlogPolicy, BlogService};
use crate::store::MemoryBlogStore;

/// Unique file path inside its own temp directory, so tests never share state.
pub fn temp_store_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("blog_store_{}", uuid::Uuid::new_v4()))
        .join("blogs.json")
}

/// Service over an unbounded in-memory store.
pub fn memory_service(max_content_len: usize) -> BlogService<MemoryBlogStore> {
    BlogService::new(Arc::new(MemoryBlogStore::default()), BlogPolicy { max_content_len })
}
