use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, StorageBackend};
use service::{
    blog::{BlogPolicy, BlogService},
    store::{BlogStore, JsonFileBlogStore, MemoryBlogStore},
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Construct the configured store backend.
pub async fn build_store(cfg: &AppConfig) -> anyhow::Result<Arc<dyn BlogStore>> {
    let storage = &cfg.storage;
    let store: Arc<dyn BlogStore> = match storage.backend {
        StorageBackend::Memory => Arc::new(MemoryBlogStore::new(storage.capacity)),
        StorageBackend::File => {
            JsonFileBlogStore::open(&storage.path, storage.capacity, storage.io_timeout()).await?
        }
    };
    info!(
        backend = ?storage.backend,
        capacity = ?storage.capacity,
        blogs = store.count().await,
        "blog store ready"
    );
    Ok(store)
}

pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    let store = build_store(cfg).await?;
    let policy = BlogPolicy { max_content_len: cfg.blog.max_content_len };
    Ok(AppState::new(Arc::new(BlogService::new(store, policy))))
}

pub fn build_app(state: AppState, cfg: &AppConfig) -> Router {
    common::metrics::register_all();
    routes::build_router(state, build_cors(), cfg.server.body_limit_bytes)
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Build the app and serve until `shutdown` resolves.
pub async fn run_until<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&cfg).await?;
    let app = build_app(state, &cfg);

    let addr = bind_addr(&cfg)?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "blog server listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("blog server stopped");
    Ok(())
}

/// Public entry: serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    run_until(cfg, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("received Ctrl+C, shutting down");
    })
    .await
}
