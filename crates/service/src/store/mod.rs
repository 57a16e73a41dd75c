//! Blog persistence.
//!
//! Both backends share [`BlogLog`]: an append-only, id-ordered record list.
//! Inserts are serialized by an async mutex; readers load an immutable
//! snapshot through `ArcSwap` and never wait on a writer. A new snapshot is
//! published only after the record is durable (for backends that persist).

use std::future::Future;
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use chrono::Utc;
use models::blog::{Blog, BlogId};
use thiserror::Error;
use tokio::sync::Mutex;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileBlogStore;
pub use memory::MemoryBlogStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("blog {0} not found")]
    NotFound(BlogId),
    #[error("{0}")]
    StorageFull(String),
    #[error("{0}")]
    Storage(String),
}

/// Storage abstraction for blog records.
/// Implementations allocate ids; callers never choose them.
#[async_trait]
pub trait BlogStore: Send + Sync {
    /// Allocate the next id (max + 1, starting at 1), stamp the current time and persist.
    async fn insert(&self, content: String) -> Result<Blog, StoreError>;
    async fn get(&self, id: BlogId) -> Result<Blog, StoreError>;
    /// All records in insertion order.
    async fn list(&self) -> Vec<Blog>;
    async fn count(&self) -> usize;
}

pub(crate) struct BlogLog {
    snapshot: ArcSwap<Vec<Blog>>,
    write: Mutex<()>,
    capacity: Option<usize>,
}

impl BlogLog {
    /// `records` must already be sorted by id without duplicates.
    pub(crate) fn new(records: Vec<Blog>, capacity: Option<usize>) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(records),
            write: Mutex::new(()),
            capacity,
        }
    }

    pub(crate) fn list(&self) -> Vec<Blog> {
        self.snapshot.load().to_vec()
    }

    pub(crate) fn count(&self) -> usize {
        self.snapshot.load().len()
    }

    pub(crate) fn get(&self, id: BlogId) -> Result<Blog, StoreError> {
        let snap = self.snapshot.load();
        snap.binary_search_by_key(&id, |b| b.id)
            .map(|idx| snap[idx].clone())
            .map_err(|_| StoreError::NotFound(id))
    }

    /// Append a record under the write lock. `persist` receives the full
    /// next snapshot; if it fails nothing is published.
    pub(crate) async fn append<F, Fut>(&self, content: String, persist: F) -> Result<Blog, StoreError>
    where
        F: FnOnce(Arc<Vec<Blog>>) -> Fut + Send,
        Fut: Future<Output = Result<(), StoreError>> + Send,
    {
        let _guard = self.write.lock().await;
        let current = self.snapshot.load_full();

        if let Some(cap) = self.capacity {
            if current.len() >= cap {
                return Err(StoreError::StorageFull(format!("capacity of {cap} blogs reached")));
            }
        }
        let id = match current.last() {
            Some(last) => last
                .id
                .checked_add(1)
                .ok_or_else(|| StoreError::StorageFull("blog id space exhausted".into()))?,
            None => 1,
        };

        let blog = Blog { id, content, created_at: Utc::now() };
        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        next.push(blog.clone());
        let next = Arc::new(next);

        persist(Arc::clone(&next)).await?;
        self.snapshot.store(next);
        Ok(blog)
    }
}
