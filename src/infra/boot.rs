use std::net::SocketAddr;

use crate::clients::emi_backend::EmiBackend;
use crate::infra::config::{Config, Mode};

/// Serve MCP with the given configuration and block until shutdown.
pub async fn run_server(cfg: Config) -> anyhow::Result<()> {
    tracing::info!(
        mode = %cfg.mode,
        port = cfg.port,
        deprecate_rest = cfg.deprecate_rest,
        base_url = %cfg.backend.base_url,
        "BOOT emi-mcp-gateway"
    );

    if cfg.mode == Mode::Stdio {
        let factory = crate::infra::mcp::factory_from_config(&cfg.backend);
        crate::infra::runtime::mcp_transport::serve_stdio(factory)
            .await
            .map_err(|e| anyhow::anyhow!(e))?;
        return Ok(());
    }

    let backend = EmiBackend::from_config(&cfg.backend);
    let app = if cfg.deprecate_rest {
        crate::infra::http_app::build_app_default(backend)
    } else {
        crate::infra::http_app::build_app_with_rpc(backend)
    };

    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn app_factory_selects_stdio_by_default() {
        std::env::remove_var("MODE");
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.mode, Mode::Stdio);
    }
}
