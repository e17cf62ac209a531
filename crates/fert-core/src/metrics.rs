//! Remaining-payoff and completion figures for a token at a given progress.

use crate::errors::{ErrorInfo, FertError};
use crate::types::{DerivedMetrics, TokenRecord};

/// Raw BPF units per displayed unit.
pub const DISPLAY_DIVISOR: f64 = 1_000_000.0;

/// Decimal places used for displayed BPF amounts.
pub const DISPLAY_DECIMALS: u32 = 2;

fn token_info(code: &str, message: &str, token: &TokenRecord) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("id", token.id.to_string())
        .with_context("start_progress", token.start_progress.to_string())
        .with_context("end_progress", token.end_progress.to_string())
}

/// Checks the data-model invariants of a token record.
///
/// A token whose start equals its end has an empty repayment range and is
/// rejected here so that [`compute_metrics`] never divides by zero.
pub fn validate_token(token: &TokenRecord) -> Result<(), FertError> {
    if token.end_progress != token.id {
        return Err(FertError::Token(token_info(
            "fert_core.token_ceiling",
            "end progress must equal the token id",
            token,
        )));
    }
    if token.start_progress > token.end_progress {
        return Err(FertError::Token(token_info(
            "fert_core.token_range",
            "start progress exceeds end progress",
            token,
        )));
    }
    if token.start_progress == token.end_progress {
        return Err(FertError::Token(
            token_info(
                "fert_core.token_degenerate",
                "start progress equals end progress; completion is undefined",
                token,
            )
            .with_hint("the token has an empty repayment range and cannot be rendered"),
        ));
    }
    if !token.humidity.is_finite() || token.humidity < 0.0 {
        return Err(FertError::Token(
            ErrorInfo::new("fert_core.token_humidity", "humidity must be finite and non-negative")
                .with_context("id", token.id.to_string())
                .with_context("humidity", token.humidity.to_string()),
        ));
    }
    Ok(())
}

/// Computes the derived metrics of `token` at global progress `progress`.
pub fn compute_metrics(token: &TokenRecord, progress: u64) -> Result<DerivedMetrics, FertError> {
    validate_token(token)?;
    let remaining = token.end_progress.saturating_sub(progress);
    let span = (token.end_progress - token.start_progress) as f64;
    let covered = (i128::from(progress) - i128::from(token.start_progress)) as f64;
    Ok(DerivedMetrics {
        remaining,
        completion: covered / span,
        observed_at: None,
    })
}

/// Converts raw BPF units to display units without rounding.
pub fn display_amount(raw: u64) -> f64 {
    raw as f64 / DISPLAY_DIVISOR
}

/// Rounds `value` half away from zero to `places` decimals.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Display amount rounded to [`DISPLAY_DECIMALS`].
pub fn display_rounded(raw: u64) -> f64 {
    round_to(display_amount(raw), DISPLAY_DECIMALS)
}
