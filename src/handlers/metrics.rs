use axum::response::IntoResponse;
use prometheus::{Encoder, TextEncoder};

use crate::metrics::TRACKED_IDENTITIES;

pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %err, "failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Refresh gauges that are sampled rather than event-driven.
pub fn refresh_gauges(tracked_identities: usize) {
    TRACKED_IDENTITIES.set(tracked_identities as f64);
}
