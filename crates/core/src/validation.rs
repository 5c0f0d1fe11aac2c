//! Shared range-checking helpers for engine inputs.

use rust_decimal::Decimal;

use crate::error::CoreError;

/// Earliest calendar year accepted by the baseline evaluator.
pub const MIN_YEAR: i32 = 1;
/// Latest calendar year accepted by the baseline evaluator.
pub const MAX_YEAR: i32 = 9999;

/// Validate that a reporting year is a positive four-digit calendar year.
pub fn validate_year(year: i32) -> Result<(), CoreError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(CoreError::Validation(format!(
            "year must be between {MIN_YEAR} and {MAX_YEAR}, got {year}"
        )));
    }
    Ok(())
}

/// Validate that a sizing metric is strictly positive.
///
/// Returns a `CoreError::Validation` naming the field otherwise.
pub fn validate_positive(value: Decimal, name: &str) -> Result<(), CoreError> {
    if value <= Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "{name} must be greater than zero, got {value}"
        )));
    }
    Ok(())
}
