use axum::{
    routing::{any_service, get, post},
    Router,
};
use std::sync::Arc;

use crate::clients::emi_backend::EmiBackend;
use crate::infra::mcp;
use crate::infra::runtime::mcp_transport::{make_streamable_http_service, LocalSessionManager};
use crate::tools::emi::EmiTools;
use crate::tools::registry::build_registry;

/// Default app: `/healthz` + streamable MCP at `/mcp`.
pub fn build_app_default(backend: EmiBackend) -> Router {
    let session_mgr = Arc::new(LocalSessionManager::default());
    let mcp_service = make_streamable_http_service(mcp::make_factory(backend), session_mgr);

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route_service("/mcp", any_service(mcp_service))
}

/// Default app **plus** the plain JSON-RPC shim at `/v1/rpc`.
pub fn build_app_with_rpc(backend: EmiBackend) -> Router {
    let registry = build_registry(EmiTools::new(backend.clone()));

    build_app_default(backend).merge(
        Router::new()
            .route("/v1/rpc", post(crate::api::rpc::http))
            .with_state(registry),
    )
}
