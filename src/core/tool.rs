use async_trait::async_trait;
use thiserror::Error;

use crate::core::error::ArgsError;

/// Minimal metadata every tool must expose.
pub trait ToolSpec {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn input_schema(&self) -> serde_json::Value;
}

/// Tool = Spec + call. A backend failure is a successful call whose value is
/// the error result; only bad arguments are reported as `Err`.
#[async_trait]
pub trait Tool: ToolSpec + Send + Sync {
    async fn call(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, ArgsError>;
}

#[derive(Debug, Error)]
pub enum ToolCallError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error(transparent)]
    Args(#[from] ArgsError),
}
