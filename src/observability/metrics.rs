use std::sync::Arc;

use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

/// Exporter self-metrics, rendered after the upstream category blocks in
/// the `/metrics` response.
#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Category fetch metrics
    pub category_fetch_requests: IntCounterVec,
    pub category_fetch_failures: IntCounterVec,
    pub category_fetch_duration: HistogramVec,
    pub cache_refresh_cycles: IntCounter,

    // Credential metrics
    pub token_refreshes: IntCounter,
    pub token_refresh_failures: IntCounter,
    pub token_expiry_unix: IntGauge,

    // Runtime
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("site24x7_exporter".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            category_fetch_requests: IntCounterVec::new(Opts::new("category_fetch_requests_total", "Upstream fetch attempts by category"), &["category"]).unwrap(),
            category_fetch_failures: IntCounterVec::new(Opts::new("category_fetch_failures_total", "Upstream fetch failures by category and reason"), &["category", "reason"]).unwrap(),
            category_fetch_duration: HistogramVec::new(HistogramOpts::new("category_fetch_duration_seconds", "Fetch-and-render duration seconds").buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]), &["category"]).unwrap(),
            cache_refresh_cycles: IntCounter::new("cache_refresh_cycles_total", "Periodic refresh cycles started").unwrap(),

            token_refreshes: IntCounter::new("token_refreshes_total", "Successful credential refreshes").unwrap(),
            token_refresh_failures: IntCounter::new("token_refresh_failures_total", "Failed credential refresh attempts").unwrap(),
            token_expiry_unix: IntGauge::new("token_expiry_unix_seconds", "Credential expiry timestamp").unwrap(),

            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.category_fetch_requests.clone())).unwrap();
        reg.register(Box::new(metrics.category_fetch_failures.clone())).unwrap();
        reg.register(Box::new(metrics.category_fetch_duration.clone())).unwrap();
        reg.register(Box::new(metrics.cache_refresh_cycles.clone())).unwrap();
        reg.register(Box::new(metrics.token_refreshes.clone())).unwrap();
        reg.register(Box::new(metrics.token_refresh_failures.clone())).unwrap();
        reg.register(Box::new(metrics.token_expiry_unix.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
