use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static BLOG_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("blog_created_total", "Total blogs successfully created")
        .expect("register blog_created_total")
});

pub static BLOG_CREATE_REJECTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "blog_create_rejected_total",
        "Total create requests rejected by content validation or storage capacity"
    )
    .expect("register blog_create_rejected_total")
});

pub static BLOG_LOOKUP_NOT_FOUND_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "blog_lookup_not_found_total",
        "Total lookups for blog ids that do not exist"
    )
    .expect("register blog_lookup_not_found_total")
});

/// Force registration so every counter shows up in `/metrics` from the start.
pub fn register_all() {
    Lazy::force(&BLOG_CREATED_TOTAL);
    Lazy::force(&BLOG_CREATE_REJECTED_TOTAL);
    Lazy::force(&BLOG_LOOKUP_NOT_FOUND_TOTAL);
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}
