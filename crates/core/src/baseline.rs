//! PPSCC baseline evaluation and threshold bands.
//!
//! A trajectory is the cubic `a·y³ + b·y² + c·y + d` in the calendar year,
//! scaled by `capacity^e`. The minimum trajectory also defines the lower and
//! upper reporting bands.

use serde::{Deserialize, Serialize};

use crate::decimal::{self, Decimal};
use crate::error::CoreError;
use crate::trajectory::{select_trajectories, CoefficientRow, TrajectoryPair};
use crate::validation::{validate_positive, validate_year};

/// Lower band as a fraction of the minimum baseline (0.33).
pub const LOWER_BAND_FACTOR: Decimal = Decimal::from_parts(33, 0, 0, false, 2);
/// Upper band as a fraction of the minimum baseline (1.67).
pub const UPPER_BAND_FACTOR: Decimal = Decimal::from_parts(167, 0, 0, false, 2);

/// The four reportable baseline metrics for one (class, year, capacity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineSet {
    pub minimum: Decimal,
    pub striving: Decimal,
    pub lower_band: Decimal,
    pub upper_band: Decimal,
}

/// Evaluate one trajectory for `year` and `capacity`.
///
/// Absent coefficients count as zero.
pub fn evaluate_baseline(
    row: &CoefficientRow,
    year: i32,
    capacity: Decimal,
) -> Result<Decimal, CoreError> {
    let coefficient = |c: Option<Decimal>| c.unwrap_or(Decimal::ZERO);
    let year = Decimal::from(year);

    let polynomial = decimal::sum([
        decimal::mul(coefficient(row.a), decimal::powi(year, 3)?)?,
        decimal::mul(coefficient(row.b), decimal::powi(year, 2)?)?,
        decimal::mul(coefficient(row.c), year)?,
        coefficient(row.d),
    ])?;

    decimal::mul(polynomial, decimal::pow(capacity, coefficient(row.e))?)
}

/// Combine the selected trajectories into a [`BaselineSet`].
pub fn compute_band_set(
    pair: &TrajectoryPair,
    year: i32,
    capacity: Decimal,
) -> Result<BaselineSet, CoreError> {
    let minimum = evaluate_baseline(&pair.minimum, year, capacity)?;
    let striving = evaluate_baseline(&pair.striving, year, capacity)?;

    Ok(BaselineSet {
        minimum,
        striving,
        lower_band: decimal::mul(minimum, LOWER_BAND_FACTOR)?,
        upper_band: decimal::mul(minimum, UPPER_BAND_FACTOR)?,
    })
}

/// Select the trajectories from `rows` and compute the baseline set.
///
/// Usable on its own for reporting; `year` and `capacity` are range-checked.
pub fn compute_baselines(
    rows: &[CoefficientRow],
    year: i32,
    capacity: Decimal,
) -> Result<BaselineSet, CoreError> {
    validate_year(year)?;
    validate_positive(capacity, "capacity")?;

    compute_band_set(&select_trajectories(rows), year, capacity)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    use super::*;

    fn constant_row(tag: &str, k: Decimal) -> CoefficientRow {
        CoefficientRow {
            trajectory: tag.to_string(),
            a: Some(Decimal::ZERO),
            b: Some(Decimal::ZERO),
            c: Some(Decimal::ZERO),
            d: Some(k),
            e: Some(Decimal::ZERO),
        }
    }

    #[test]
    fn band_factors_are_exact() {
        assert_eq!(LOWER_BAND_FACTOR, dec!(0.33));
        assert_eq!(UPPER_BAND_FACTOR, dec!(1.67));
    }

    #[test]
    fn constant_row_is_constant_for_any_year_and_capacity() {
        let row = constant_row("MIN", dec!(7.25));
        for year in [1990, 2019, 2024, 2050] {
            for capacity in [dec!(1), dec!(5000), dec!(50000), dec!(0.5)] {
                assert_eq!(evaluate_baseline(&row, year, capacity).unwrap(), dec!(7.25));
            }
        }
    }

    #[test]
    fn missing_coefficients_are_zero() {
        let row = CoefficientRow {
            trajectory: "MIN".into(),
            d: Some(dec!(3)),
            ..CoefficientRow::default()
        };
        assert_eq!(evaluate_baseline(&row, 2024, dec!(50000)).unwrap(), dec!(3));
    }

    #[test]
    fn cubic_terms_are_exact() {
        // 1e-9·2024³ + 1e-6·2024² + 0.001·2024 + 1
        let row = CoefficientRow {
            trajectory: "MIN".into(),
            a: Some(dec!(0.000000001)),
            b: Some(dec!(0.000001)),
            c: Some(dec!(0.001)),
            d: Some(dec!(1)),
            e: Some(Decimal::ZERO),
        };
        let value = evaluate_baseline(&row, 2024, dec!(50000)).unwrap();
        assert_eq!(value, dec!(8.291469824) + dec!(4.096576) + dec!(2.024) + dec!(1));
    }

    #[test]
    fn capacity_exponent_scales_the_polynomial() {
        let row = CoefficientRow {
            trajectory: "MIN".into(),
            d: Some(dec!(2)),
            e: Some(dec!(-1)),
            ..CoefficientRow::default()
        };
        assert_eq!(evaluate_baseline(&row, 2024, dec!(50000)).unwrap(), dec!(0.00004));
    }

    #[test]
    fn fractional_exponent_is_evaluated() {
        let row = CoefficientRow {
            trajectory: "MIN".into(),
            d: Some(dec!(3)),
            e: Some(dec!(0.5)),
            ..CoefficientRow::default()
        };
        let value = evaluate_baseline(&row, 2024, dec!(40000)).unwrap();
        assert!((value - dec!(600)).abs() < dec!(0.001), "got {value}");
    }

    #[test]
    fn bands_derive_from_minimum() {
        let rows = vec![constant_row("MIN", dec!(10)), constant_row("STR", dec!(8))];
        let set = compute_baselines(&rows, 2024, dec!(50000)).unwrap();
        assert_eq!(set.minimum, dec!(10));
        assert_eq!(set.striving, dec!(8));
        assert_eq!(set.lower_band, dec!(3.3));
        assert_eq!(set.upper_band, dec!(16.7));
    }

    #[test]
    fn band_ratios_hold_for_positive_minimum() {
        for k in [dec!(0.0001), dec!(1), dec!(12.5), dec!(987654.321)] {
            let rows = vec![constant_row("MIN", k)];
            let set = compute_baselines(&rows, 2024, dec!(1)).unwrap();
            assert_eq!(set.lower_band / set.minimum, dec!(0.33));
            assert_eq!(set.upper_band / set.minimum, dec!(1.67));
        }
    }

    #[test]
    fn unmatched_striving_evaluates_to_zero() {
        let rows = vec![constant_row("MIN", dec!(10))];
        let set = compute_baselines(&rows, 2024, dec!(50000)).unwrap();
        assert_eq!(set.striving, Decimal::ZERO);
    }

    #[test]
    fn rejects_non_positive_capacity() {
        let rows = vec![constant_row("MIN", dec!(10))];
        assert_matches!(
            compute_baselines(&rows, 2024, Decimal::ZERO),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn rejects_invalid_year() {
        let rows = vec![constant_row("MIN", dec!(10))];
        assert_matches!(
            compute_baselines(&rows, 0, dec!(50000)),
            Err(CoreError::Validation(_))
        );
    }
}
