use serde::Serialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Gateway-wide error model for startup and configuration failures.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("{0}")]
    Message(String),
}

impl From<anyhow::Error> for GatewayError {
    fn from(e: anyhow::Error) -> Self {
        GatewayError::Message(e.to_string())
    }
}

/// An outbound backend call that did not produce a usable JSON body.
///
/// Serializes to `{"error":"backend_error","details":..,"payload":..}` and is
/// handed back to MCP callers as a tool result rather than a protocol error.
#[derive(Debug, Clone, Error, Serialize, PartialEq)]
#[error("backend_error: {details}")]
pub struct BackendError {
    #[serde(rename = "error")]
    kind: &'static str,
    pub details: String,
    pub payload: JsonValue,
}

impl BackendError {
    pub const KIND: &'static str = "backend_error";

    pub fn new(details: impl Into<String>, payload: JsonValue) -> Self {
        let details = details.into();
        let details = if details.trim().is_empty() {
            "unknown backend failure".to_string()
        } else {
            details
        };
        Self { kind: Self::KIND, details, payload }
    }

    pub fn to_json(&self) -> JsonValue {
        serde_json::json!({
            "error": self.kind,
            "details": self.details,
            "payload": self.payload,
        })
    }
}

/// Tool arguments that could not be turned into a backend payload.
#[derive(Debug, Error)]
pub enum ArgsError {
    #[error("invalid arguments for {tool}: {source}")]
    Invalid {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn it_displays_message() {
        let e = GatewayError::Message("boom".into());
        assert_eq!(e.to_string(), "boom");
    }

    #[test]
    fn it_converts_from_anyhow() {
        let any: anyhow::Error = anyhow::anyhow!("nope");
        let gw: GatewayError = any.into();
        assert_eq!(gw.to_string(), "nope");
    }

    #[test]
    fn backend_error_serializes_to_error_result_shape() {
        let err = BackendError::new("upstream status 500", json!({"principal": 1}));
        let v = serde_json::to_value(&err).unwrap();
        assert_eq!(
            v,
            json!({"error": "backend_error", "details": "upstream status 500", "payload": {"principal": 1}})
        );
        assert_eq!(err.to_json(), v);
    }

    #[test]
    fn backend_error_details_are_never_empty() {
        let err = BackendError::new("", json!({}));
        assert!(!err.details.is_empty());
    }

    #[test]
    fn args_error_names_the_tool() {
        let source = serde_json::from_value::<u32>(json!("x")).unwrap_err();
        let err = ArgsError::Invalid { tool: "compare_loans", source };
        assert!(err.to_string().starts_with("invalid arguments for compare_loans"));
    }
}
