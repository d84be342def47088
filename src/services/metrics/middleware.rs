use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;

use super::MetricsRegistry;

/// Count and time every request.
pub async fn metrics_middleware(
    State(metrics): State<Arc<MetricsRegistry>>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    metrics
        .http_requests_total
        .with_label_values(&[&method, &path, &status])
        .inc();
    metrics
        .http_request_duration_seconds
        .with_label_values(&[&method, &path])
        .observe(duration);

    response
}

/// Collapse id segments to keep label cardinality bounded:
/// `/api/ciphers/<uuid>` becomes `/api/ciphers/:id`.
fn normalize_path(path: &str) -> String {
    let normalized: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| if is_id_like(s) { ":id" } else { s })
        .collect();

    format!("/{}", normalized.join("/"))
}

fn is_id_like(segment: &str) -> bool {
    if segment.len() == 36 && segment.chars().filter(|c| *c == '-').count() == 4 {
        return true;
    }

    if segment.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }

    // Client-chosen device identifiers are not always uuids.
    segment.len() >= 20 && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
