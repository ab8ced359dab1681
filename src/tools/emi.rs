//! The four EMI tools: turn typed arguments into the backend payload, relay
//! it, and hand back either the backend body or the `backend_error` value.

use serde::Serialize;
use serde_json::{json, Value as JsonValue};

use crate::clients::emi_backend::EmiBackend;
use crate::core::error::{ArgsError, BackendError};
use crate::domain::{
    CompareLoansArgs, ComparePayload, LoanPayload, LoanScenario, PrepaymentPayload,
    PrepaymentScenario, Route, DEFAULT_CALCULATION_METHOD,
};

/// Stable tool names exposed to MCP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmiTool {
    CalculateEmi,
    CalculateSchedule,
    CompareLoans,
    CalculateWithPrepayment,
}

impl EmiTool {
    pub const ALL: [EmiTool; 4] = [
        EmiTool::CalculateEmi,
        EmiTool::CalculateSchedule,
        EmiTool::CompareLoans,
        EmiTool::CalculateWithPrepayment,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EmiTool::CalculateEmi => "calculate_emi",
            EmiTool::CalculateSchedule => "calculate_schedule",
            EmiTool::CompareLoans => "compare_loans",
            EmiTool::CalculateWithPrepayment => "calculate_with_prepayment",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            EmiTool::CalculateEmi => "Calculate the equated monthly instalment (EMI) for a single loan",
            EmiTool::CalculateSchedule => "Retrieve the amortization schedule for a loan",
            EmiTool::CompareLoans => "Compare EMI outputs for multiple loan scenarios in one call",
            EmiTool::CalculateWithPrepayment => {
                "Calculate EMI outcomes when regular prepayments reduce the outstanding principal"
            }
        }
    }

    pub fn input_schema(self) -> JsonValue {
        fn loan(extra: JsonValue, required: &[&str]) -> JsonValue {
            let mut props = json!({
                "principal": { "type": "number", "description": "Loan amount" },
                "interestRate": { "type": "number", "description": "Annual interest rate in percent, e.g. 9.5" },
                "tenure": { "type": "integer", "description": "Tenure in months" },
                "calculationMethod": { "type": "string", "default": DEFAULT_CALCULATION_METHOD }
            });
            if let (Some(p), JsonValue::Object(e)) = (props.as_object_mut(), extra) {
                p.extend(e);
            }
            json!({ "type": "object", "properties": props, "required": required })
        }
        match self {
            EmiTool::CalculateEmi | EmiTool::CalculateSchedule => {
                loan(json!({}), &["principal", "interestRate", "tenure"])
            }
            EmiTool::CalculateWithPrepayment => loan(
                json!({
                    "prepaymentAmount": { "type": "number" },
                    "prepaymentFrequency": { "type": "string", "description": "e.g. monthly, quarterly, yearly" },
                    "prepaymentStartMonth": { "type": "integer", "description": "1-indexed month prepayments begin" }
                }),
                &[
                    "principal",
                    "interestRate",
                    "tenure",
                    "prepaymentAmount",
                    "prepaymentFrequency",
                    "prepaymentStartMonth",
                ],
            ),
            EmiTool::CompareLoans => json!({
                "type": "object",
                "properties": {
                    "scenarios": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "principal": { "type": "number" },
                                "interestRate": { "type": "number" },
                                "tenure": { "type": "integer" },
                                "calculationMethod": { "type": "string" }
                            },
                            "required": ["principal", "interestRate", "tenure"]
                        }
                    },
                    "calculationMethod": { "type": "string", "default": DEFAULT_CALCULATION_METHOD }
                },
                "required": ["scenarios"]
            }),
        }
    }
}

#[derive(Clone)]
pub struct EmiTools {
    backend: EmiBackend,
}

impl EmiTools {
    pub fn new(backend: EmiBackend) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &EmiBackend {
        &self.backend
    }

    pub async fn calculate_emi(&self, args: LoanScenario) -> JsonValue {
        self.relay(Route::CalculateEmi, LoanPayload::from(args)).await
    }

    pub async fn calculate_schedule(&self, args: LoanScenario) -> JsonValue {
        self.relay(Route::AmortizationSchedule, LoanPayload::from(args)).await
    }

    pub async fn compare_loans(&self, args: CompareLoansArgs) -> JsonValue {
        self.relay(Route::CompareLoans, ComparePayload::from(args)).await
    }

    pub async fn calculate_with_prepayment(&self, args: PrepaymentScenario) -> JsonValue {
        self.relay(Route::CalculateWithPrepayment, PrepaymentPayload::from(args))
            .await
    }

    /// Dispatch by tool name with raw JSON arguments. Argument errors are
    /// raised before anything is sent to the backend.
    pub async fn call_json(&self, tool: EmiTool, arguments: &JsonValue) -> Result<JsonValue, ArgsError> {
        let name = tool.name();
        let out = match tool {
            EmiTool::CalculateEmi => self.calculate_emi(parse_args(name, arguments)?).await,
            EmiTool::CalculateSchedule => self.calculate_schedule(parse_args(name, arguments)?).await,
            EmiTool::CompareLoans => self.compare_loans(parse_args(name, arguments)?).await,
            EmiTool::CalculateWithPrepayment => {
                self.calculate_with_prepayment(parse_args(name, arguments)?)
                    .await
            }
        };
        Ok(out)
    }

    async fn relay<P: Serialize>(&self, route: Route, payload: P) -> JsonValue {
        let payload = match serde_json::to_value(payload) {
            Ok(v) => v,
            Err(e) => return BackendError::new(e.to_string(), JsonValue::Null).to_json(),
        };
        match self.backend.post(route, payload).await {
            Ok(body) => body,
            Err(err) => err.to_json(),
        }
    }
}

pub fn parse_args<T: serde::de::DeserializeOwned>(
    tool: &'static str,
    arguments: &JsonValue,
) -> Result<T, ArgsError> {
    // Absent arguments behave like an empty object so serde names the missing field.
    let arguments = match arguments {
        JsonValue::Null => JsonValue::Object(Default::default()),
        other => other.clone(),
    };
    serde_json::from_value(arguments).map_err(|source| ArgsError::Invalid { tool, source })
}
