use async_trait::async_trait;
use models::blog::{Blog, BlogId};

use super::{BlogLog, BlogStore, StoreError};

/// In-process blog store. Contents are lost on restart.
pub struct MemoryBlogStore {
    log: BlogLog,
}

impl MemoryBlogStore {
    /// `capacity` caps the number of records; `None` means unlimited.
    pub fn new(capacity: Option<usize>) -> Self {
        Self { log: BlogLog::new(Vec::new(), capacity) }
    }
}

impl Default for MemoryBlogStore {
    fn default() -> Self { Self::new(None) }
}

#[async_trait]
impl BlogStore for MemoryBlogStore {
    async fn insert(&self, content: String) -> Result<Blog, StoreError> {
        self.log.append(content, |_| async { Ok(()) }).await
    }

    async fn get(&self, id: BlogId) -> Result<Blog, StoreError> { self.log.get(id) }

    async fn list(&self) -> Vec<Blog> { self.log.list() }

    async fn count(&self) -> usize { self.log.count() }
}
