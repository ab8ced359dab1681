//! Wiring between configuration and the MCP handler.
//!
//! Every session (one per stdio process, one per Streamable HTTP session)
//! gets a fresh `EmiSvc` sharing the same relay, so the base URL and HTTP
//! connection pool are fixed for the life of the process.

use crate::clients::emi_backend::EmiBackend;
use crate::infra::config::BackendConfig;
use crate::tools::emi::EmiTools;
use crate::tools::router::{EmiRouter, EmiSvc};

/// Factory required by rmcp Streamable HTTP & stdio transports:
/// must return a `(handler, ToolRouter<handler>)` pair.
pub fn make_factory(backend: EmiBackend) -> impl Fn() -> (EmiSvc, EmiRouter) + Clone + Send + Sync + 'static {
    let tools = EmiTools::new(backend);
    move || (EmiSvc { tools: tools.clone() }, EmiSvc::router())
}

pub fn factory_from_config(cfg: &BackendConfig) -> impl Fn() -> (EmiSvc, EmiRouter) + Clone + Send + Sync + 'static {
    tracing::info!(base_url = %cfg.base_url, timeout_secs = cfg.timeout.as_secs(), "EMI backend configured");
    make_factory(EmiBackend::from_config(cfg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn factory_shares_the_configured_base_url() {
        let cfg = BackendConfig {
            base_url: "http://emi.example/api".into(),
            timeout: Duration::from_secs(1),
        };
        let factory = factory_from_config(&cfg);
        let (a, _) = factory();
        let (b, _) = factory();
        assert_eq!(a.tools.backend().base_url(), "http://emi.example/api");
        assert_eq!(a.tools.backend().url_for("/calculate-emi"), b.tools.backend().url_for("/calculate-emi"));
    }
}
