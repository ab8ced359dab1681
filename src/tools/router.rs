use std::future::Future;

use rmcp::handler::server::tool::{Parameters, ToolRouter};
use rmcp::model::{CallToolResult, Content, JsonObject, ServerCapabilities, ServerInfo};
use serde_json::Value as JsonValue;

use crate::infra::runtime::mcp_transport::ServerHandler;
use crate::tools::emi::{EmiTool, EmiTools};

/// MCP handler exposing the EMI tools.
#[derive(Clone)]
pub struct EmiSvc {
    pub tools: EmiTools,
}

impl ServerHandler for EmiSvc {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Loan EMI calculations relayed to the EMI backend. Backend failures come back as \
                 {\"error\":\"backend_error\",\"details\":..,\"payload\":..}."
                    .into(),
            ),
            ..Default::default()
        }
    }
}

#[rmcp::tool_router]
impl EmiSvc {
    #[rmcp::tool(
        name = "calculate_emi",
        description = "Calculate the equated monthly instalment (EMI) for a single loan. Args: principal, interestRate (annual %), tenure (months), calculationMethod (default \"reducing\")"
    )]
    async fn calculate_emi(
        &self,
        params: Parameters<JsonObject>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.dispatch(EmiTool::CalculateEmi, params.0).await
    }

    #[rmcp::tool(
        name = "calculate_schedule",
        description = "Retrieve the amortization schedule for a loan. Args: principal, interestRate (annual %), tenure (months), calculationMethod (default \"reducing\")"
    )]
    async fn calculate_schedule(
        &self,
        params: Parameters<JsonObject>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.dispatch(EmiTool::CalculateSchedule, params.0).await
    }

    #[rmcp::tool(
        name = "compare_loans",
        description = "Compare EMI outputs for multiple loans. Args: scenarios [{name?, principal, interestRate, tenure, calculationMethod?}], calculationMethod (default for scenarios, \"reducing\")"
    )]
    async fn compare_loans(
        &self,
        params: Parameters<JsonObject>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.dispatch(EmiTool::CompareLoans, params.0).await
    }

    #[rmcp::tool(
        name = "calculate_with_prepayment",
        description = "Calculate EMI outcomes with regular prepayments. Args: principal, interestRate, tenure, prepaymentAmount, prepaymentFrequency (e.g. monthly, quarterly), prepaymentStartMonth (1-indexed), calculationMethod"
    )]
    async fn calculate_with_prepayment(
        &self,
        params: Parameters<JsonObject>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        self.dispatch(EmiTool::CalculateWithPrepayment, params.0).await
    }
}

impl EmiSvc {
    async fn dispatch(
        &self,
        tool: EmiTool,
        args: JsonObject,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        tracing::debug!(tool = tool.name(), params = ?args, "tool invoked");
        let out = self
            .tools
            .call_json(tool, &JsonValue::Object(args))
            .await
            .map_err(|e| rmcp::ErrorData::invalid_params(e.to_string(), None))?;
        tracing::trace!(tool = tool.name(), result = %out, "tool returning");
        Ok(into_tool_result(out))
    }
}

/// Backend bodies go out as JSON text; objects are also attached as structured content.
fn into_tool_result(out: JsonValue) -> CallToolResult {
    let mut result = CallToolResult::success(vec![Content::text(out.to_string())]);
    if out.is_object() {
        result.structured_content = Some(out);
    }
    result
}

pub type EmiRouter = ToolRouter<EmiSvc>;

impl EmiSvc {
    pub fn router() -> EmiRouter {
        // Wrapper to expose the macro-generated private tool_router
        Self::tool_router()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::emi_backend::EmiBackend;
    use httpmock::prelude::*;
    use serde_json::json;

    fn svc(base: impl Into<String>) -> EmiSvc {
        EmiSvc { tools: EmiTools::new(EmiBackend::new(base)) }
    }

    fn params(v: JsonValue) -> Parameters<JsonObject> {
        Parameters(v.as_object().unwrap().clone())
    }

    fn structured(result: CallToolResult) -> JsonValue {
        result.structured_content.expect("object bodies carry structured content")
    }

    fn first_text(result: &CallToolResult) -> String {
        let v = serde_json::to_value(result).unwrap();
        v["content"][0]["text"].as_str().unwrap().to_string()
    }

    #[test]
    fn router_contains_all_four_tools() {
        let names: Vec<String> = EmiSvc::router()
            .into_iter()
            .map(|r| r.name().to_string())
            .collect();
        for expected in EmiTool::ALL {
            assert!(
                names.iter().any(|n| n == expected.name()),
                "missing tool '{}', got: {:?}",
                expected.name(),
                names
            );
        }
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn server_info_advertises_tools() {
        let info = svc("http://test").get_info();
        assert!(info.capabilities.tools.is_some());
    }

    #[tokio::test]
    async fn calculate_emi_passes_backend_body_through() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/calculate-emi");
            then.status(200).json_body(json!({"emi": 8792.5}));
        });
        let result = svc(server.base_url())
            .calculate_emi(params(json!({"principal": 100000, "interestRate": 9.5, "tenure": 12})))
            .await
            .expect("tool should succeed");
        let text: JsonValue = serde_json::from_str(&first_text(&result)).unwrap();
        assert_eq!(text, json!({"emi": 8792.5}));
        assert_eq!(structured(result), json!({"emi": 8792.5}));
    }

    #[tokio::test]
    async fn array_body_is_returned_as_text_only() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/amortization-schedule");
            then.status(200).json_body(json!([{"month": 1}, {"month": 2}]));
        });
        let result = svc(server.base_url())
            .calculate_schedule(params(json!({"principal": 1000, "interestRate": 9.5, "tenure": 2})))
            .await
            .expect("tool should succeed");
        assert!(result.structured_content.is_none());
        let text: JsonValue = serde_json::from_str(&first_text(&result)).unwrap();
        assert_eq!(text, json!([{"month": 1}, {"month": 2}]));
    }

    #[tokio::test]
    async fn scalar_body_is_returned_as_text_only() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/calculate-emi");
            then.status(200).json_body(json!(8792.5));
        });
        let result = svc(server.base_url())
            .calculate_emi(params(json!({"principal": 100000, "interestRate": 9.5, "tenure": 12})))
            .await
            .expect("tool should succeed");
        assert!(result.structured_content.is_none());
        assert_eq!(first_text(&result), "8792.5");
    }

    #[tokio::test]
    async fn backend_failure_is_a_successful_tool_result() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/calculate-with-prepayment");
            then.status(503).body("down");
        });
        let out = svc(server.base_url())
            .calculate_with_prepayment(params(json!({
                "principal": 10, "interestRate": 1, "tenure": 2,
                "prepaymentAmount": 1, "prepaymentFrequency": "monthly", "prepaymentStartMonth": 1
            })))
            .await
            .map(structured)
            .expect("backend errors are values");
        assert_eq!(out["error"], "backend_error");
        assert_eq!(out["payload"]["prepayment_frequency"], "monthly");
    }

    #[tokio::test]
    async fn compare_loans_missing_field_is_invalid_params() {
        let res = svc("http://127.0.0.1:9")
            .compare_loans(params(json!({"scenarios": [{"interestRate": 9.5, "tenure": 12}]})))
            .await;
        let err = match res {
            Err(e) => e,
            Ok(_) => panic!("expected invalid params error, got Ok"),
        };
        // JSON-RPC invalid params is -32602
        assert_eq!(err.code.0, -32602);
        assert!(err.message.contains("principal"), "got: {}", err.message);
    }

    #[tokio::test]
    async fn calculate_schedule_wrong_type_is_invalid_params() {
        let res = svc("http://127.0.0.1:9")
            .calculate_schedule(params(json!({"principal": "lots", "interestRate": 9.5, "tenure": 12})))
            .await;
        assert!(res.is_err());
    }

    #[test]
    fn test_server_handler_trait_impl() {
        fn assert_server_handler<T: ServerHandler>(_handler: T) {}
        assert_server_handler(svc("http://test"));
    }
}
