use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::IntoResponse;
use error_stack::{Report, ResultExt};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tokio::time::Instant;

const REQUEST_DURATION_METRIC_NAME: &str = "http_requests_duration_seconds";
const REQUEST_SIZE_METRIC_NAME: &str = "http_request_size";
const REQUESTS_TOTAL_METRIC_NAME: &str = "http_requests_total";

const CONTAINERS_BUILT_METRIC_NAME: &str = "containers_built";
const ASSETS_RETRIEVED_METRIC_NAME: &str = "assets_retrieved";
const VIDEOS_RETRIEVED_METRIC_NAME: &str = "videos_retrieved";

const VIDEOS_CREATED_METRIC_NAME: &str = "num_videos_created";
const VIDEOS_PATCHED_METRIC_NAME: &str = "num_videos_patched";
const VIDEOS_DELETED_METRIC_NAME: &str = "num_videos_deleted";

const ASSETS_CREATED_METRIC_NAME: &str = "num_assets_created";
const ASSETS_PATCHED_METRIC_NAME: &str = "num_assets_patched";
const ASSETS_DELETED_METRIC_NAME: &str = "num_assets_deleted";

#[derive(Debug, thiserror::Error)]
#[error("failed to install prometheus recorder")]
pub struct RecorderSetupErr;

/// Installs the global recorder. Can only succeed once per process.
pub fn setup_recorder() -> Result<PrometheusHandle, Report<RecorderSetupErr>> {
    const EXPONENTIAL_SECONDS: &[f64] = &[0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

    const REQ_RES_BUCKETS: &[f64] = &[128.0, 256.0, 512.0, 1024.0, 2048.0, 4096.0, 8192.0, 16384.0];

    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION_METRIC_NAME.to_string()),
            EXPONENTIAL_SECONDS,
        )
        .change_context(RecorderSetupErr)?
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_SIZE_METRIC_NAME.to_string()),
            REQ_RES_BUCKETS,
        )
        .change_context(RecorderSetupErr)?
        .install_recorder()
        .change_context(RecorderSetupErr)
}

pub async fn track_http(req: Request, next: Next) -> impl IntoResponse {
    // route template when matched, so ids don't explode label cardinality
    let path = if let Some(matched_path) = req.extensions().get::<MatchedPath>() {
        matched_path.as_str().to_owned()
    } else {
        req.uri().path().to_owned()
    };

    if path.ends_with("metrics") {
        return next.run(req).await;
    }

    let method = req.method().clone();

    let req_size = req
        .headers()
        .get("Content-Length")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<usize>().ok());

    if let Some(req_size) = req_size {
        metrics::histogram!(REQUEST_SIZE_METRIC_NAME).record(req_size as f64);
    }

    let start = Instant::now();
    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    let labels = [
        ("method", method.to_string()),
        ("path", path),
        ("status", status),
    ];

    metrics::counter!(REQUESTS_TOTAL_METRIC_NAME, &labels).increment(1);
    metrics::histogram!(REQUEST_DURATION_METRIC_NAME, &labels).record(latency);

    response
}

#[inline]
fn increment_by(name: &'static str, amt: usize) {
    metrics::counter!(name).increment(amt as u64);
}

#[inline]
pub fn increment_containers_built_by(amt: usize) {
    increment_by(CONTAINERS_BUILT_METRIC_NAME, amt);
}

#[inline]
pub fn increment_assets_retrieved_by(amt: usize) {
    increment_by(ASSETS_RETRIEVED_METRIC_NAME, amt);
}

#[inline]
pub fn increment_videos_retrieved_by(amt: usize) {
    increment_by(VIDEOS_RETRIEVED_METRIC_NAME, amt);
}

#[inline]
pub fn increment_videos_created() {
    metrics::counter!(VIDEOS_CREATED_METRIC_NAME).increment(1);
}

#[inline]
pub fn increment_videos_patched() {
    metrics::counter!(VIDEOS_PATCHED_METRIC_NAME).increment(1);
}

#[inline]
pub fn increment_videos_deleted() {
    metrics::counter!(VIDEOS_DELETED_METRIC_NAME).increment(1);
}

#[inline]
pub fn increment_assets_created() {
    metrics::counter!(ASSETS_CREATED_METRIC_NAME).increment(1);
}

#[inline]
pub fn increment_assets_patched() {
    metrics::counter!(ASSETS_PATCHED_METRIC_NAME).increment(1);
}

#[inline]
pub fn increment_assets_deleted() {
    metrics::counter!(ASSETS_DELETED_METRIC_NAME).increment(1);
}
