use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

use realty_projection_core::investment::{
    compare_investments as core_compare, project_investment as core_project, ComparisonInput,
    ProjectionInput,
};
use realty_projection_core::mortgage::{self, MortgageInput};
use realty_projection_core::property::{analyze_listing as core_listing, ListingAnalysisInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Investments
// ---------------------------------------------------------------------------

#[napi]
pub fn project_investment(input_json: String) -> NapiResult<String> {
    let input: ProjectionInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = core_project(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_investments(input_json: String) -> NapiResult<String> {
    let input: ComparisonInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = core_compare(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Mortgage
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_mortgage(input_json: String) -> NapiResult<String> {
    let input: MortgageInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage::analyze_mortgage(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Monthly payment only. Decimals travel as strings to keep precision.
#[napi]
pub fn calculate_mortgage_payment(
    principal: String,
    rate_pct: String,
    term_years: u32,
) -> NapiResult<String> {
    let principal = Decimal::from_str(&principal).map_err(to_napi_error)?;
    let rate_pct = Decimal::from_str(&rate_pct).map_err(to_napi_error)?;
    let payment = mortgage::calculate_mortgage_payment(principal, rate_pct, term_years)
        .map_err(to_napi_error)?;
    Ok(payment.to_string())
}

// ---------------------------------------------------------------------------
// Property listings
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_listing(input_json: String) -> NapiResult<String> {
    let input: ListingAnalysisInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = core_listing(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
