use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Per-application metrics registry. Each `create_app` gets its own, so
/// nothing is shared between test servers.
pub struct MetricsRegistry {
    registry: Registry,

    // HTTP
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,

    // Token grants
    pub token_grants_total: CounterVec,

    // Vault writes
    pub vault_mutations_total: CounterVec,
}

impl MetricsRegistry {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests").namespace("vaultsync"),
            &["method", "endpoint", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request duration")
                .namespace("vaultsync")
                .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
            &["method", "endpoint"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        let token_grants_total = CounterVec::new(
            Opts::new("token_grants_total", "Token grant attempts by grant type and outcome")
                .namespace("vaultsync"),
            &["grant_type", "outcome"],
        )?;
        registry.register(Box::new(token_grants_total.clone()))?;

        let vault_mutations_total = CounterVec::new(
            Opts::new("vault_mutations_total", "Committed folder and cipher writes")
                .namespace("vaultsync"),
            &["entity", "action"],
        )?;
        registry.register(Box::new(vault_mutations_total.clone()))?;

        Ok(Arc::new(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            token_grants_total,
            vault_mutations_total,
        }))
    }

    pub fn record_token_grant(&self, grant_type: &str, outcome: &str) {
        self.token_grants_total
            .with_label_values(&[grant_type, outcome])
            .inc();
    }

    pub fn record_vault_mutation(&self, entity: &str, action: &str) {
        self.vault_mutations_total
            .with_label_values(&[entity, action])
            .inc();
    }

    /// Prometheus text exposition of everything registered.
    pub fn export(&self) -> Result<String, Box<dyn std::error::Error>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
