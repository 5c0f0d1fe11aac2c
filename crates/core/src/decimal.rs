//! Exact decimal arithmetic shared by every baseline and deviation computation.
//!
//! This is the only place the engine touches numeric primitives. All
//! operations are checked: overflow surfaces as
//! [`CoreError::ArithmeticOverflow`] and a zero divisor as
//! [`CoreError::DivisionByZero`]. Nothing here rounds through binary floating
//! point.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::MathematicalOps;
use serde_json::Value;

use crate::error::CoreError;

pub use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

/// Add two decimals.
pub fn add(lhs: Decimal, rhs: Decimal) -> Result<Decimal, CoreError> {
    lhs.checked_add(rhs)
        .ok_or(CoreError::ArithmeticOverflow("addition"))
}

/// Subtract `rhs` from `lhs`.
pub fn sub(lhs: Decimal, rhs: Decimal) -> Result<Decimal, CoreError> {
    lhs.checked_sub(rhs)
        .ok_or(CoreError::ArithmeticOverflow("subtraction"))
}

/// Multiply two decimals.
pub fn mul(lhs: Decimal, rhs: Decimal) -> Result<Decimal, CoreError> {
    lhs.checked_mul(rhs)
        .ok_or(CoreError::ArithmeticOverflow("multiplication"))
}

/// Sum any number of terms. An empty sequence sums to zero.
pub fn sum<I>(terms: I) -> Result<Decimal, CoreError>
where
    I: IntoIterator<Item = Decimal>,
{
    terms.into_iter().try_fold(Decimal::ZERO, add)
}

/// Divide `numerator` by `denominator`.
///
/// A zero denominator is a [`CoreError::DivisionByZero`], never `NaN` or
/// infinity.
pub fn div(numerator: Decimal, denominator: Decimal) -> Result<Decimal, CoreError> {
    if denominator.is_zero() {
        return Err(CoreError::DivisionByZero);
    }
    numerator
        .checked_div(denominator)
        .ok_or(CoreError::ArithmeticOverflow("division"))
}

/// Raise `base` to an integer power.
pub fn powi(base: Decimal, exponent: i64) -> Result<Decimal, CoreError> {
    base.checked_powi(exponent)
        .ok_or(CoreError::ArithmeticOverflow("integer power"))
}

/// Raise `base` to a decimal power.
///
/// A zero exponent yields exactly one and integral exponents take the exact
/// [`powi`] path. Only genuinely fractional exponents go through the
/// series-based `powd`, which is precise to the decimal's 28 digits.
pub fn pow(base: Decimal, exponent: Decimal) -> Result<Decimal, CoreError> {
    if exponent.is_zero() {
        return Ok(Decimal::ONE);
    }
    if exponent.fract().is_zero() {
        if let Some(exp) = exponent.to_i64() {
            return powi(base, exp);
        }
    }
    base.checked_powd(exponent)
        .ok_or(CoreError::ArithmeticOverflow("decimal power"))
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse decimal text exactly. Plain and scientific notation are accepted.
pub fn parse_str(text: &str) -> Option<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Read an optional numeric field from a JSON record.
///
/// `null` or an absent field is `Ok(None)`; numbers and numeric strings
/// parse exactly; anything else is a [`CoreError::MalformedCoefficientRow`]
/// naming the row and field. JSON numbers keep their source text because
/// serde_json is built with `arbitrary_precision`.
pub fn parse_json_field(
    row: &str,
    field: &'static str,
    value: Option<&Value>,
) -> Result<Option<Decimal>, CoreError> {
    let malformed = |value: &Value| CoreError::MalformedCoefficientRow {
        row: row.to_string(),
        field,
        value: value.to_string(),
    };

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v @ Value::Number(n)) => parse_str(&n.to_string())
            .map(Some)
            .ok_or_else(|| malformed(v)),
        Some(v @ Value::String(s)) => parse_str(s).map(Some).ok_or_else(|| malformed(v)),
        Some(other) => Err(malformed(other)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    #[test]
    fn sum_of_nothing_is_zero() {
        assert_eq!(sum(Vec::<Decimal>::new()).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn sum_is_exact_where_binary_floats_drift() {
        let total = sum([dec!(0.1), dec!(0.2)]).unwrap();
        assert_eq!(total, dec!(0.3));
    }

    #[test]
    fn sum_overflow_is_reported() {
        assert_matches!(
            sum([Decimal::MAX, Decimal::MAX]),
            Err(CoreError::ArithmeticOverflow(_))
        );
    }

    #[test]
    fn div_by_zero_is_an_error() {
        assert_matches!(div(dec!(1), Decimal::ZERO), Err(CoreError::DivisionByZero));
    }

    #[test]
    fn div_exact() {
        assert_eq!(div(dec!(2), dec!(10)).unwrap(), dec!(0.2));
    }

    #[test]
    fn powi_cubes_a_year() {
        assert_eq!(powi(dec!(2024), 3).unwrap(), dec!(8291469824));
    }

    #[test]
    fn pow_zero_exponent_is_one() {
        assert_eq!(pow(dec!(50000), Decimal::ZERO).unwrap(), Decimal::ONE);
    }

    #[test]
    fn pow_integral_exponent_is_exact() {
        assert_eq!(pow(dec!(50000), dec!(2.0)).unwrap(), dec!(2500000000));
        assert_eq!(pow(dec!(4), dec!(-1)).unwrap(), dec!(0.25));
    }

    #[test]
    fn pow_fractional_exponent_is_close() {
        let root = pow(dec!(10000), dec!(0.5)).unwrap();
        assert!((root - dec!(100)).abs() < dec!(0.001), "got {root}");
    }

    #[test]
    fn parse_str_accepts_scientific_notation() {
        assert_eq!(parse_str("1.5e-3"), Some(dec!(0.0015)));
        assert_eq!(parse_str(" 42.10 "), Some(dec!(42.10)));
        assert_eq!(parse_str("abc"), None);
    }

    #[test]
    fn parse_json_field_missing_is_none() {
        assert_eq!(parse_json_field("1", "a", None).unwrap(), None);
        assert_eq!(parse_json_field("1", "a", Some(&Value::Null)).unwrap(), None);
    }

    #[test]
    fn parse_json_field_reads_numbers_and_strings() {
        assert_eq!(
            parse_json_field("1", "d", Some(&json!(10))).unwrap(),
            Some(dec!(10))
        );
        assert_eq!(
            parse_json_field("1", "e", Some(&json!("-0.622"))).unwrap(),
            Some(dec!(-0.622))
        );
    }

    #[test]
    fn parse_json_field_keeps_digits_beyond_f64() {
        let value: Value = serde_json::from_str("0.1234567890123456789012").unwrap();
        assert_eq!(
            parse_json_field("1", "a", Some(&value)).unwrap(),
            Some(dec!(0.1234567890123456789012))
        );

        let value: Value = serde_json::from_str("-2.0000000000000000001E-7").unwrap();
        assert_eq!(
            parse_json_field("1", "e", Some(&value)).unwrap(),
            Some(dec!(-0.00000020000000000000000001))
        );
    }

    #[test]
    fn parse_json_field_rejects_non_numeric() {
        assert_matches!(
            parse_json_field("7", "b", Some(&json!("n/a"))),
            Err(CoreError::MalformedCoefficientRow { field: "b", .. })
        );
        assert_matches!(
            parse_json_field("7", "c", Some(&json!(true))),
            Err(CoreError::MalformedCoefficientRow { field: "c", .. })
        );
    }
}
