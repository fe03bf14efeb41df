use napi::Result as NapiResult;
use napi_derive::napi;
use serde_json::json;

use finmodel_core::assumptions::{load, validation};
use finmodel_core::calendar::period_end_dates;
use finmodel_core::three_statement::build_projection;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Project all three statements from a JSON assumption set.
#[napi]
pub fn project_financial_model(input_json: String) -> NapiResult<String> {
    let assumptions = load::from_json_str(&input_json).map_err(to_napi_error)?;
    let output = build_projection(&assumptions).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Validate a JSON assumption set and return its period range and warnings.
#[napi]
pub fn validate_assumptions(input_json: String) -> NapiResult<String> {
    let assumptions = load::from_json_str(&input_json).map_err(to_napi_error)?;
    let warnings = validation::validate_assumptions(&assumptions).map_err(to_napi_error)?;
    let dates = period_end_dates(
        assumptions.model_settings.start_date,
        assumptions.num_periods(),
    )
    .map_err(to_napi_error)?;

    serde_json::to_string(&json!({
        "valid": true,
        "num_periods": assumptions.num_periods(),
        "first_period_date": dates.first(),
        "last_period_date": dates.last(),
        "warnings": warnings,
    }))
    .map_err(to_napi_error)
}
