use napi::Result as NapiResult;
use napi_derive::napi;

use hdb_resale_core::loan::amortization::{self, AmortizationInput};
use hdb_resale_core::pipeline::{self, PurchaseAnalysisInput};
use hdb_resale_core::purchase::downpayment::{self, DownpaymentInput};
use hdb_resale_core::purchase::stamp_duty::{self, StampDutyInput};
use hdb_resale_core::scenarios::sensitivity::{self, SensitivityInput};
use hdb_resale_core::types::{from_json, to_json};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_purchase(input_json: String) -> NapiResult<String> {
    let input: PurchaseAnalysisInput = from_json(&input_json).map_err(to_napi_error)?;
    let output = pipeline::analyze_purchase(&input).map_err(to_napi_error)?;
    to_json(&output).map_err(to_napi_error)
}

#[napi]
pub fn sensitivity(input_json: String) -> NapiResult<String> {
    let input: SensitivityInput = from_json(&input_json).map_err(to_napi_error)?;
    let output = sensitivity::run_sensitivity(&input).map_err(to_napi_error)?;
    to_json(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Individual stages
// ---------------------------------------------------------------------------

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: AmortizationInput = from_json(&input_json).map_err(to_napi_error)?;
    let output = amortization::build_amortization_schedule(&input).map_err(to_napi_error)?;
    to_json(&output).map_err(to_napi_error)
}

#[napi]
pub fn stamp_duty(input_json: String) -> NapiResult<String> {
    let input: StampDutyInput = from_json(&input_json).map_err(to_napi_error)?;
    let output = stamp_duty::calculate_stamp_duty(&input).map_err(to_napi_error)?;
    to_json(&output).map_err(to_napi_error)
}

#[napi]
pub fn downpayment_split(input_json: String) -> NapiResult<String> {
    let input: DownpaymentInput = from_json(&input_json).map_err(to_napi_error)?;
    let output = downpayment::split_downpayment_for(&input).map_err(to_napi_error)?;
    to_json(&output).map_err(to_napi_error)
}
