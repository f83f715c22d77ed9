use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static SEARCHES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("media_catalog_searches_total", "Catalog searches served")
        .expect("register searches_total")
});

pub static STREAMS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("media_catalog_streams_total", "Song streams started")
        .expect("register streams_total")
});

pub static UPLOADS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("media_catalog_uploads_total", "Uploads committed")
        .expect("register uploads_total")
});

pub static UPLOAD_BYTES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("media_catalog_upload_bytes_total", "Bytes written by committed uploads")
        .expect("register upload_bytes_total")
});

pub static FAVORITES_ADDED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("media_catalog_favorites_added_total", "Favorite saves acknowledged")
        .expect("register favorites_added_total")
});

pub static HANDLER_ERRORS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("media_catalog_handler_errors_total", "Handler error responses")
        .expect("register handler_errors_total")
});

/// Touch every counter so all series appear on the first scrape.
pub fn register_all() {
    Lazy::force(&SEARCHES_TOTAL);
    Lazy::force(&STREAMS_TOTAL);
    Lazy::force(&UPLOADS_TOTAL);
    Lazy::force(&UPLOAD_BYTES_TOTAL);
    Lazy::force(&FAVORITES_ADDED_TOTAL);
    Lazy::force(&HANDLER_ERRORS_TOTAL);
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

pub async fn metrics_handler() -> Response {
    register_all();
    let (status, body) = encode_metrics();
    if status.is_success() {
        (status, [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response()
    } else {
        (status, body).into_response()
    }
}
