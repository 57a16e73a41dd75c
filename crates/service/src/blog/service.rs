use std::sync::Arc;

use common::metrics::{BLOG_CREATED_TOTAL, BLOG_CREATE_REJECTED_TOTAL, BLOG_LOOKUP_NOT_FOUND_TOTAL};
use models::blog::{validate_content, Blog, BlogId};
use tracing::{debug, error, info, instrument, warn};

use crate::errors::ServiceError;
use crate::store::{BlogStore, StoreError};

/// Validation limits applied before anything reaches the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlogPolicy {
    pub max_content_len: usize,
}

/// Application service encapsulating blog business rules.
/// The store is injected by the caller; the service holds no global state.
pub struct BlogService<S: BlogStore + ?Sized> {
    store: Arc<S>,
    policy: BlogPolicy,
}

impl<S: BlogStore + ?Sized> BlogService<S> {
    pub fn new(store: Arc<S>, policy: BlogPolicy) -> Self { Self { store, policy } }

    pub fn policy(&self) -> BlogPolicy { self.policy }

    /// Validate content, then let the store allocate id and timestamp.
    #[instrument(skip(self, content), fields(content_len = content.len()))]
    pub async fn create_blog(&self, content: String) -> Result<Blog, ServiceError> {
        if let Err(e) = validate_content(&content, self.policy.max_content_len) {
            BLOG_CREATE_REJECTED_TOTAL.inc();
            debug!(error = %e, "blog content rejected");
            return Err(e.into());
        }
        match self.store.insert(content).await {
            Ok(blog) => {
                BLOG_CREATED_TOTAL.inc();
                info!(id = blog.id, "blog created");
                Ok(blog)
            }
            Err(e) if counts_as_rejection(&e) => {
                BLOG_CREATE_REJECTED_TOTAL.inc();
                warn!(error = %e, "blog insert rejected");
                Err(e.into())
            }
            Err(e) => {
                error!(error = %e, "blog insert failed");
                Err(e.into())
            }
        }
    }

    /// Ids are positive; anything else is rejected before touching the store.
    #[instrument(skip(self))]
    pub async fn get_blog(&self, id: i64) -> Result<Blog, ServiceError> {
        let id = BlogId::try_from(id)
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| ServiceError::InvalidInput(format!("blog id must be positive, got {id}")))?;
        self.store.get(id).await.map_err(|e| {
            if matches!(e, StoreError::NotFound(_)) {
                BLOG_LOOKUP_NOT_FOUND_TOTAL.inc();
            }
            debug!(error = %e, "blog lookup failed");
            ServiceError::from(e)
        })
    }

    pub async fn list_blogs(&self) -> Vec<Blog> {
        let blogs = self.store.list().await;
        debug!(count = blogs.len(), "listed blogs");
        blogs
    }
}

/// Storage limits count as rejections; I/O failures are errors, not rejections.
fn counts_as_rejection(e: &StoreError) -> bool {
    matches!(e, StoreError::StorageFull(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBlogStore;
    use crate::test_support::memory_service;

    #[tokio::test]
    async fn ids_strictly_increase() {
        let svc = memory_service(100);
        let mut last = 0;
        for content in ["a", "b b", "c\nc", "δ"] {
            let blog = svc.create_blog(content.into()).await.unwrap();
            assert!(blog.id > last);
            last = blog.id;
        }
    }

    #[tokio::test]
    async fn get_returns_what_create_stored() {
        let svc = memory_service(100);
        let created = svc.create_blog("  keep my whitespace ".into()).await.unwrap();
        let fetched = svc.get_blog(created.id as i64).await.unwrap();
        assert_eq!(fetched.content, "  keep my whitespace ");
        assert_eq!(fetched.created_at, created.created_at);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn list_len_matches_successful_creates() {
        let svc = memory_service(5);
        let mut ok = 0;
        for content in ["one", "", "three", "toolongtext", "five"] {
            if svc.create_blog(content.into()).await.is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 3);
        assert_eq!(svc.list_blogs().await.len(), 3);
    }

    #[tokio::test]
    async fn empty_content_is_invalid_and_not_stored() {
        let svc = memory_service(100);
        let err = svc.create_blog(String::new()).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert!(svc.list_blogs().await.is_empty());

        // id 1 was not consumed
        assert_eq!(svc.create_blog("x".into()).await.unwrap().id, 1);
    }

    #[tokio::test]
    async fn over_limit_content_is_invalid() {
        let svc = memory_service(3);
        assert!(matches!(
            svc.create_blog("abcd".into()).await,
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(svc.create_blog("abc".into()).await.is_ok());
    }

    #[tokio::test]
    async fn non_positive_ids_are_invalid() {
        let svc = memory_service(100);
        svc.create_blog("present".into()).await.unwrap();
        for id in [0, -1, i64::MIN] {
            assert!(matches!(svc.get_blog(id).await, Err(ServiceError::InvalidInput(_))));
        }
    }

    #[tokio::test]
    async fn unknown_id_on_empty_store_is_not_found() {
        let svc = memory_service(100);
        assert_eq!(
            svc.get_blog(999_999).await,
            Err(ServiceError::NotFound("blog 999999 not found".into()))
        );
    }

    #[tokio::test]
    async fn full_store_surfaces_storage_full() {
        let svc = BlogService::new(
            Arc::new(MemoryBlogStore::new(Some(1))),
            BlogPolicy { max_content_len: 10 },
        );
        svc.create_blog("first".into()).await.unwrap();
        assert!(matches!(
            svc.create_blog("second".into()).await,
            Err(ServiceError::StorageFull(_))
        ));
        assert_eq!(svc.list_blogs().await.len(), 1);
    }

    #[test]
    fn only_storage_limits_count_as_rejections() {
        assert!(counts_as_rejection(&StoreError::StorageFull("capacity".into())));
        assert!(!counts_as_rejection(&StoreError::Storage("write failed".into())));
        assert!(!counts_as_rejection(&StoreError::NotFound(1)));
    }

    #[tokio::test]
    async fn storage_failure_surfaces_as_storage_error() {
        struct BrokenStore;

        #[async_trait::async_trait]
        impl BlogStore for BrokenStore {
            async fn insert(&self, _content: String) -> Result<Blog, StoreError> {
                Err(StoreError::Storage("disk gone".into()))
            }
            async fn get(&self, id: BlogId) -> Result<Blog, StoreError> { Err(StoreError::NotFound(id)) }
            async fn list(&self) -> Vec<Blog> { Vec::new() }
            async fn count(&self) -> usize { 0 }
        }

        let svc = BlogService::new(Arc::new(BrokenStore), BlogPolicy { max_content_len: 10 });
        assert!(matches!(svc.create_blog("hi".into()).await, Err(ServiceError::Storage(_))));
    }

    #[tokio::test]
    async fn works_behind_trait_object() {
        let store: Arc<dyn BlogStore> = Arc::new(MemoryBlogStore::default());
        let svc: BlogService<dyn BlogStore> = BlogService::new(store, BlogPolicy { max_content_len: 10 });
        let b = svc.create_blog("dyn".into()).await.unwrap();
        assert_eq!(svc.get_blog(b.id as i64).await.unwrap().content, "dyn");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn parallel_creates_never_duplicate_ids() {
        let svc = Arc::new(memory_service(100));
        let handles: Vec<_> = (0..200)
            .map(|i| {
                let svc = Arc::clone(&svc);
                tokio::spawn(async move { svc.create_blog(format!("post {i}")).await.unwrap().id })
            })
            .collect();
        let mut ids = Vec::with_capacity(handles.len());
        for h in handles {
            ids.push(h.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 200);
        assert_eq!(svc.list_blogs().await.len(), 200);
    }
}
