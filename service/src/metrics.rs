//! # Prometheus Metrics
//!
//! Operational metrics for the crypto sidecar, scraped at `/metrics` on
//! the dedicated metrics port.
//!
//! All metrics live in a dedicated [`prometheus::Registry`] so they do not
//! collide with any default global registry consumers. Failure counters
//! deliberately don't distinguish decryption-failure causes — the metrics
//! endpoint is as oracle-free as the API.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};
use std::sync::Arc;

/// Holds all Prometheus metric handles for the service.
///
/// Clone-friendly (prometheus handles wrap `Arc` internally) so it can be
/// shared across request handlers.
#[derive(Clone)]
pub struct ServiceMetrics {
    /// Prometheus registry that owns all metrics below.
    registry: Registry,
    /// Total encrypt operations attempted.
    pub encrypt_total: IntCounter,
    /// Total decrypt operations attempted.
    pub decrypt_total: IntCounter,
    /// Total decrypt operations that failed (any cause).
    pub decrypt_failures_total: IntCounter,
    /// Total DID generation operations attempted.
    pub did_total: IntCounter,
    /// Total commitment (zk-proof) generation operations attempted.
    pub proof_total: IntCounter,
    /// Total requests rejected as malformed input.
    pub input_errors_total: IntCounter,
    /// Histogram of key-derivation latency in seconds. PBKDF2 at 100k
    /// iterations dominates request time; watch this when tuning workers.
    pub kdf_latency_seconds: Histogram,
}

impl ServiceMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Self {
        let registry = Registry::new_custom(Some("vault".into()), None)
            .expect("failed to create prometheus registry");

        fn counter(registry: &Registry, name: &str, help: &str) -> IntCounter {
            let c = IntCounter::new(name, help).expect("metric creation");
            registry
                .register(Box::new(c.clone()))
                .expect("metric registration");
            c
        }

        let encrypt_total = counter(
            &registry,
            "encrypt_requests_total",
            "Total encrypt operations attempted",
        );
        let decrypt_total = counter(
            &registry,
            "decrypt_requests_total",
            "Total decrypt operations attempted",
        );
        let decrypt_failures_total = counter(
            &registry,
            "decrypt_failures_total",
            "Total failed decrypt operations, all causes",
        );
        let did_total = counter(
            &registry,
            "did_requests_total",
            "Total DID generation operations attempted",
        );
        let proof_total = counter(
            &registry,
            "proof_requests_total",
            "Total commitment generation operations attempted",
        );
        let input_errors_total = counter(
            &registry,
            "input_errors_total",
            "Total requests rejected as malformed input",
        );

        let kdf_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "kdf_latency_seconds",
                "Password key derivation latency in seconds",
            )
            .buckets(vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
        )
        .expect("metric creation");
        registry
            .register(Box::new(kdf_latency_seconds.clone()))
            .expect("metric registration");

        Self {
            registry,
            encrypt_total,
            decrypt_total,
            decrypt_failures_total,
            did_total,
            proof_total,
            input_errors_total,
            kdf_latency_seconds,
        }
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer).expect("prometheus output is valid utf-8"))
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared metrics state passed to axum handlers.
pub type SharedMetrics = Arc<ServiceMetrics>;

/// Axum handler that renders `/metrics` in Prometheus text format.
///
/// Returns HTTP 500 if encoding fails (should never happen in practice).
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}
