//! Tool arguments as callers send them, and the payloads the EMI backend
//! expects. Amounts and rates are kept as JSON numbers so whatever the caller
//! sent (`100000`, `9.5`) reaches the backend untouched. Scenario fields of
//! `compare_loans` are forwarded as raw JSON; range and type checks belong to
//! the backend.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value as JsonValue};

pub const DEFAULT_CALCULATION_METHOD: &str = "reducing";

fn default_calculation_method() -> String {
    DEFAULT_CALCULATION_METHOD.to_string()
}

/// A key that must be present; its value is forwarded as-is, `null` included.
fn present<'de, D: Deserializer<'de>>(d: D) -> Result<JsonValue, D::Error> {
    JsonValue::deserialize(d)
}

/// Whole-number argument that also accepts `12.0` or `"12"`.
fn lax_int<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    use serde::de::Error;

    let v = JsonValue::deserialize(d)?;
    let as_int = |f: f64| {
        (f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64).then_some(f as i64)
    };
    let parsed = match &v {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(as_int)),
        JsonValue::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(as_int))
        }
        _ => None,
    };
    parsed.ok_or_else(|| D::Error::custom(format!("invalid value {v}, expected a whole number")))
}

/// Backend endpoints, relative to the configured base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    CalculateEmi,
    AmortizationSchedule,
    CompareLoans,
    CalculateWithPrepayment,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::CalculateEmi => "/calculate-emi",
            Route::AmortizationSchedule => "/amortization-schedule",
            Route::CompareLoans => "/compare-loans",
            Route::CalculateWithPrepayment => "/calculate-with-prepayment",
        }
    }
}

/// Arguments of `calculate_emi` and `calculate_schedule`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanScenario {
    pub principal: Number,
    pub interest_rate: Number,
    #[serde(deserialize_with = "lax_int")]
    pub tenure: i64,
    #[serde(default = "default_calculation_method", alias = "calculation_method")]
    pub calculation_method: String,
}

/// Arguments of `calculate_with_prepayment`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepaymentScenario {
    pub principal: Number,
    pub interest_rate: Number,
    #[serde(deserialize_with = "lax_int")]
    pub tenure: i64,
    #[serde(alias = "prepayment_amount")]
    pub prepayment_amount: Number,
    #[serde(alias = "prepayment_frequency")]
    pub prepayment_frequency: String,
    #[serde(alias = "prepayment_start_month", deserialize_with = "lax_int")]
    pub prepayment_start_month: i64,
    #[serde(default = "default_calculation_method", alias = "calculation_method")]
    pub calculation_method: String,
}

/// One entry of `compare_loans.scenarios`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInput {
    #[serde(default)]
    pub name: JsonValue,
    #[serde(deserialize_with = "present")]
    pub principal: JsonValue,
    #[serde(deserialize_with = "present")]
    pub interest_rate: JsonValue,
    #[serde(deserialize_with = "present")]
    pub tenure: JsonValue,
    #[serde(default, alias = "calculation_method")]
    pub calculation_method: Option<String>,
}

/// Arguments of `compare_loans`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareLoansArgs {
    pub scenarios: Vec<ScenarioInput>,
    #[serde(default = "default_calculation_method", alias = "calculation_method")]
    pub calculation_method: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanPayload {
    pub principal: Number,
    pub annual_rate: Number,
    pub tenure_months: i64,
    pub calculation_method: String,
}

impl From<LoanScenario> for LoanPayload {
    fn from(s: LoanScenario) -> Self {
        Self {
            principal: s.principal,
            annual_rate: s.interest_rate,
            tenure_months: s.tenure,
            calculation_method: s.calculation_method,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioPayload {
    pub name: JsonValue,
    pub principal: JsonValue,
    pub annual_rate: JsonValue,
    pub tenure_months: JsonValue,
    pub calculation_method: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparePayload {
    pub scenarios: Vec<ScenarioPayload>,
}

impl From<CompareLoansArgs> for ComparePayload {
    fn from(args: CompareLoansArgs) -> Self {
        let default_method = args.calculation_method;
        let scenarios = args
            .scenarios
            .into_iter()
            .map(|s| ScenarioPayload {
                name: s.name,
                principal: s.principal,
                annual_rate: s.interest_rate,
                tenure_months: s.tenure,
                calculation_method: s
                    .calculation_method
                    .unwrap_or_else(|| default_method.clone()),
            })
            .collect();
        Self { scenarios }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrepaymentPayload {
    pub principal: Number,
    pub annual_rate: Number,
    pub tenure_months: i64,
    pub prepayment_amount: Number,
    pub prepayment_frequency: String,
    pub prepayment_start_month: i64,
    pub calculation_method: String,
}

impl From<PrepaymentScenario> for PrepaymentPayload {
    fn from(s: PrepaymentScenario) -> Self {
        Self {
            principal: s.principal,
            annual_rate: s.interest_rate,
            tenure_months: s.tenure,
            prepayment_amount: s.prepayment_amount,
            prepayment_frequency: s.prepayment_frequency,
            prepayment_start_month: s.prepayment_start_month,
            calculation_method: s.calculation_method,
        }
    }
}
