use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, http::StatusCode, routing::get, Json, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::{metrics, types::Health};
use service::{blog::BlogService, store::BlogStore};

pub mod blogs;

/// Shared handler state. The service (and its store) is built once at
/// startup and cloned into every request by `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub blogs: Arc<BlogService<dyn BlogStore>>,
}

impl AppState {
    pub fn new(blogs: Arc<BlogService<dyn BlogStore>>) -> Self { Self { blogs } }
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics_handler() -> (StatusCode, String) {
    metrics::encode_metrics()
}

/// Build the full application router: blog API, health and metrics
pub fn build_router(state: AppState, cors: CorsLayer, body_limit: usize) -> Router {
    let api = Router::new()
        .route("/api/blogs", get(blogs::list_blogs).post(blogs::create_blog))
        .route("/api/blogs/:id", get(blogs::get_blog))
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(CatchPanicLayer::new())
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
