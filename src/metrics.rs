//! Observability metrics for the fetch pipeline
//!
//! Counters for cache effectiveness, upstream requests and decoded rows.
//!
//! ## Architecture
//!
//! - Uses `metrics` crate macros; without an installed recorder they are no-ops
//! - Optional Prometheus exporter serving a scrape endpoint (e.g. `:9090/metrics`)
//! - Every counter is labelled with the provider id

use crate::ProviderId;
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::Lazy;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Global metrics registry initialization flag
static METRICS_INITIALIZED: Lazy<Arc<RwLock<bool>>> = Lazy::new(|| Arc::new(RwLock::new(false)));

/// Initialize metrics system with Prometheus exporter
///
/// Call once at startup. Repeated calls are ignored.
///
/// # Arguments
/// * `addr` - Socket address to bind the Prometheus scrape endpoint (e.g., "0.0.0.0:9090")
pub async fn init_metrics(addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    let mut initialized = METRICS_INITIALIZED.write().await;
    if *initialized {
        debug!("Metrics already initialized, skipping");
        return Ok(());
    }

    info!("Initializing metrics system on {}", addr);

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))?;

    describe_metrics();

    *initialized = true;
    info!("Metrics system initialized successfully on {}", addr);
    Ok(())
}

/// True once [`init_metrics`] has installed the exporter
pub async fn is_initialized() -> bool {
    *METRICS_INITIALIZED.read().await
}

/// Register metric descriptions with the installed recorder
pub fn describe_metrics() {
    describe_counter!(
        "cache_hits_total",
        Unit::Count,
        "Requests answered from the response cache"
    );

    describe_counter!(
        "cache_misses_total",
        Unit::Count,
        "Requests that had to go to the network"
    );

    describe_counter!(
        "http_requests_total",
        Unit::Count,
        "Upstream HTTP requests by provider and status"
    );

    describe_histogram!(
        "http_request_duration_seconds",
        Unit::Seconds,
        "Upstream HTTP request duration in seconds"
    );

    describe_counter!(
        "rows_decoded_total",
        Unit::Count,
        "Normalized rows produced by provider decoders"
    );
}

/// Record a response served from the cache
pub fn record_cache_hit(provider: ProviderId) {
    counter!("cache_hits_total", "provider" => provider.as_str()).increment(1);
}

/// Record a cache miss
pub fn record_cache_miss(provider: ProviderId) {
    counter!("cache_misses_total", "provider" => provider.as_str()).increment(1);
}

/// Record a completed upstream request
///
/// `status` is the HTTP status code, or `None` when the transport failed
/// before a response arrived.
pub fn record_http_request(provider: ProviderId, status: Option<u16>, elapsed: Duration) {
    let status = match status {
        Some(code) => code.to_string(),
        None => "network_error".to_string(),
    };

    counter!(
        "http_requests_total",
        "provider" => provider.as_str(),
        "status" => status,
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "provider" => provider.as_str(),
    )
    .record(elapsed.as_secs_f64());
}

/// Record rows appended by a decoder
pub fn record_rows_decoded(provider: ProviderId, rows: usize) {
    if rows == 0 {
        return;
    }
    counter!("rows_decoded_total", "provider" => provider.as_str()).increment(rows as u64);
}
