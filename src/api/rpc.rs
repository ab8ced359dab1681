//! Plain JSON-RPC 2.0 shim over the tool registry, for clients that do not
//! speak Streamable HTTP.

use axum::Json;
use serde_json::{json, Value as J};

use crate::core::mcp::{RpcReq, RpcResp, ServerInfo};
use crate::core::tool::ToolCallError;
use crate::infra::http::json as http_json;
use crate::tools::registry::ToolRegistry;

fn tools_list(reg: &ToolRegistry) -> J {
    let tools: Vec<J> = reg
        .list()
        .into_iter()
        .map(|t| json!({ "name": t.name, "description": t.description, "inputSchema": t.input_schema }))
        .collect();
    json!({ "tools": tools })
}

async fn call_tool(reg: &ToolRegistry, params: &J) -> Result<J, (i32, String)> {
    let name = params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or((-32602, "missing tool name".to_string()))?;
    let args = params.get("arguments").unwrap_or(&J::Null);
    reg.call(name, args).await.map_err(|e| match e {
        ToolCallError::UnknownTool(_) => (-32000, e.to_string()),
        ToolCallError::Args(_) => (-32602, e.to_string()),
    })
}

pub async fn http(
    axum::extract::State(reg): axum::extract::State<ToolRegistry>,
    Json(req): Json<RpcReq>,
) -> Json<RpcResp> {
    tracing::debug!(method = %req.method, id = ?req.id, "rpc handler invoked");
    let id = req.id.clone();
    let resp = match req.method.as_str() {
        "initialize" => http_json::ok(
            id,
            json!({ "serverInfo": ServerInfo::current(), "capabilities": { "tools": {} } }),
        ),
        "shutdown" => http_json::ok(id, J::Null),
        "tools.list" | "tools/list" => http_json::ok(id, tools_list(&reg)),
        "tools.call" | "tools/call" => match call_tool(&reg, &req.params).await {
            Ok(out) => http_json::ok(id, out),
            Err((code, message)) => {
                tracing::warn!(code, error = %message, "tools.call rejected");
                http_json::error(id, code, message)
            }
        },
        _ => http_json::error(id, -32601, format!("unknown method: {}", req.method)),
    };
    tracing::trace!(response = ?resp.0, "rpc handler completed");
    resp
}
