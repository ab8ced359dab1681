use std::time::Duration;

use crate::infra::config::BackendConfig;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Build a reqwest client with the default backend timeouts.
pub fn make_http_client() -> reqwest::Client {
    make_http_client_with(&BackendConfig::default())
}

/// Build a reqwest client bounded by the configured request timeout.
pub fn make_http_client_with(cfg: &BackendConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT.min(cfg.timeout))
        .timeout(cfg.timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default reqwest client");
            reqwest::Client::new()
        })
}
