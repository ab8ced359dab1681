use std::time::Instant;

use reqwest::Client;
use serde_json::Value as JsonValue;

use crate::core::error::BackendError;
use crate::domain::Route;
use crate::infra::config::BackendConfig;
use crate::infra::http::headers::add_standard_headers;
use crate::infra::runtime::limits::{make_http_client, make_http_client_with};
use crate::infra::logging::log_backend_call;

/// Relay to the EMI calculation backend. Holds the base URL fixed at
/// construction; cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct EmiBackend {
    base: String,
    http: Client,
}

impl EmiBackend {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into(), http: make_http_client() }
    }

    pub fn from_config(cfg: &BackendConfig) -> Self {
        Self { base: cfg.base_url.clone(), http: make_http_client_with(cfg) }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), path)
    }

    pub async fn health(&self) -> bool {
        let (builder, _rid) = add_standard_headers(self.http.get(self.url_for("/health")), None);
        match builder.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// POST `payload` to `route` and return the backend's JSON body as-is.
    /// Any failure carries the payload back so callers can see what was sent.
    pub async fn post(&self, route: Route, payload: JsonValue) -> Result<JsonValue, BackendError> {
        let url = self.url_for(route.path());
        let (builder, rid) = add_standard_headers(self.http.post(&url), None);
        tracing::debug!(endpoint = %url, request_id = %rid, "emi backend request");

        let start = Instant::now();
        let res = send_json(builder, &payload).await;
        let elapsed_ms = start.elapsed().as_millis() as f64;

        match res {
            Ok(body) => {
                log_backend_call(route.path(), "ok", elapsed_ms);
                Ok(body)
            }
            Err(details) => {
                log_backend_call(route.path(), "error", elapsed_ms);
                tracing::warn!(endpoint = %url, request_id = %rid, error = %details, "emi backend call failed");
                Err(BackendError::new(details, payload))
            }
        }
    }
}

async fn send_json(builder: reqwest::RequestBuilder, payload: &JsonValue) -> Result<JsonValue, String> {
    let resp = builder.json(payload).send().await.map_err(describe)?;
    let resp = resp.error_for_status().map_err(describe)?;
    resp.json::<JsonValue>().await.map_err(describe)
}

fn describe(e: reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else if let Some(status) = e.status() {
        format!("upstream status {status}: {e}")
    } else if e.is_decode() {
        format!("invalid JSON from backend: {e}")
    } else {
        e.to_string()
    }
}
