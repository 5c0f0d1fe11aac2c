//! Per-quarter deviation of actual emissions from the minimum baseline.
//!
//! Quarters without a resolved observation produce nothing. A quarter whose
//! deviation cannot be computed (zero minimum baseline) is reported in
//! [`DeviationRun::failures`] instead of [`DeviationRun::records`]; no
//! placeholder percentage is ever substituted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::baseline::BaselineSet;
use crate::decimal::{self, Decimal};
use crate::emission::EmissionMetric;
use crate::error::CoreError;
use crate::quarter::{quarter_key, Quarter, QuarterEndSelection};
use crate::types::DbId;

/// `((actual - baseline) / baseline) * 100`.
///
/// Positive means above (worse than) the baseline.
pub fn deviation_percentage(actual: Decimal, baseline: Decimal) -> Result<Decimal, CoreError> {
    let ratio = decimal::div(decimal::sub(actual, baseline)?, baseline)?;
    decimal::mul(ratio, Decimal::ONE_HUNDRED)
}

/// One vessel's deviation for one quarter.
///
/// `(vessel_id, quarter)` is the natural key; recalculation overwrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviationRecord {
    pub vessel_id: DbId,
    /// Composite key, e.g. `"2024-Q2"`.
    pub quarter: String,
    pub year: i32,
    pub quarter_end: NaiveDate,
    pub actual_emission: Decimal,
    pub baseline_emission: Decimal,
    pub deviation_percentage: Decimal,
    pub baselines: BaselineSet,
}

/// A quarter that had an observation but no computable deviation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarterFailure {
    pub quarter: Quarter,
    pub quarter_end: NaiveDate,
    pub error: CoreError,
}

/// Outcome of one `(vessel, year)` calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviationRun {
    /// Successful quarters in Q1..Q4 order.
    pub records: Vec<DeviationRecord>,
    pub failures: Vec<QuarterFailure>,
}

impl DeviationRun {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Build the deviation records for each resolved quarter.
///
/// `selections` may arrive in any order; output follows Q1..Q4. If a quarter
/// appears more than once the first selection for it is used.
pub fn build_quarter_deviations(
    vessel_id: DbId,
    year: i32,
    baselines: &BaselineSet,
    selections: &[QuarterEndSelection],
    metric: EmissionMetric,
) -> DeviationRun {
    let mut run = DeviationRun::default();

    for quarter in Quarter::ALL {
        let Some(selection) = selections.iter().find(|s| s.quarter == quarter) else {
            continue;
        };
        let Some(emission) = &selection.emission else {
            continue;
        };

        let actual = emission.total(metric);
        match deviation_percentage(actual, baselines.minimum) {
            Ok(deviation_percentage) => run.records.push(DeviationRecord {
                vessel_id,
                quarter: quarter_key(year, quarter),
                year,
                quarter_end: selection.quarter_end,
                actual_emission: actual,
                baseline_emission: baselines.minimum,
                deviation_percentage,
                baselines: baselines.clone(),
            }),
            Err(error) => run.failures.push(QuarterFailure {
                quarter,
                quarter_end: selection.quarter_end,
                error,
            }),
        }
    }

    run
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::emission::{EmissionObservation, EmissionTotals};

    fn baselines(minimum: Decimal) -> BaselineSet {
        BaselineSet {
            minimum,
            striving: dec!(8),
            lower_band: minimum * dec!(0.33),
            upper_band: minimum * dec!(1.67),
        }
    }

    fn selection(quarter: Quarter, actual: Option<Decimal>) -> QuarterEndSelection {
        let quarter_end = quarter.end_date(2024).unwrap();
        QuarterEndSelection {
            quarter,
            quarter_end,
            emission: actual.map(|total| EmissionObservation {
                id: 1,
                vessel_id: 42,
                log_id: 1,
                from_utc: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                to_utc: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
                totals: EmissionTotals {
                    tot_w2w_co2: total,
                    ..EmissionTotals::default()
                },
            }),
        }
    }

    #[test]
    fn equal_to_baseline_is_zero_percent() {
        assert_eq!(deviation_percentage(dec!(10), dec!(10)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn double_the_baseline_is_one_hundred_percent() {
        assert_eq!(deviation_percentage(dec!(20), dec!(10)).unwrap(), dec!(100));
    }

    #[test]
    fn below_baseline_is_negative() {
        assert_eq!(deviation_percentage(dec!(7.5), dec!(10)).unwrap(), dec!(-25));
    }

    #[test]
    fn zero_baseline_is_division_by_zero() {
        assert_matches!(
            deviation_percentage(dec!(5), Decimal::ZERO),
            Err(CoreError::DivisionByZero)
        );
    }

    #[test]
    fn builds_record_with_full_shape() {
        let run = build_quarter_deviations(
            42,
            2024,
            &baselines(dec!(10)),
            &[selection(Quarter::Q2, Some(dec!(12)))],
            EmissionMetric::TotW2wCo2,
        );
        assert!(run.is_complete());
        assert_eq!(run.records.len(), 1);

        let record = &run.records[0];
        assert_eq!(record.vessel_id, 42);
        assert_eq!(record.quarter, "2024-Q2");
        assert_eq!(record.year, 2024);
        assert_eq!(record.quarter_end, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert_eq!(record.actual_emission, dec!(12));
        assert_eq!(record.baseline_emission, dec!(10));
        assert_eq!(record.deviation_percentage, dec!(20));
        assert_eq!(record.baselines, baselines(dec!(10)));
    }

    #[test]
    fn unresolved_quarters_are_skipped() {
        let selections = vec![
            selection(Quarter::Q1, Some(dec!(9))),
            selection(Quarter::Q2, Some(dec!(12))),
            selection(Quarter::Q3, None),
            selection(Quarter::Q4, Some(dec!(11))),
        ];
        let run = build_quarter_deviations(
            42,
            2024,
            &baselines(dec!(10)),
            &selections,
            EmissionMetric::TotW2wCo2,
        );
        let keys: Vec<_> = run.records.iter().map(|r| r.quarter.as_str()).collect();
        assert_eq!(keys, vec!["2024-Q1", "2024-Q2", "2024-Q4"]);
        assert!(run.failures.is_empty());
    }

    #[test]
    fn output_follows_calendar_order() {
        let selections = vec![
            selection(Quarter::Q4, Some(dec!(11))),
            selection(Quarter::Q1, Some(dec!(9))),
        ];
        let run = build_quarter_deviations(
            42,
            2024,
            &baselines(dec!(10)),
            &selections,
            EmissionMetric::TotW2wCo2,
        );
        let keys: Vec<_> = run.records.iter().map(|r| r.quarter.as_str()).collect();
        assert_eq!(keys, vec!["2024-Q1", "2024-Q4"]);
    }

    #[test]
    fn zero_baseline_fails_per_quarter() {
        let selections = vec![
            selection(Quarter::Q1, Some(dec!(9))),
            selection(Quarter::Q2, Some(dec!(12))),
        ];
        let run = build_quarter_deviations(
            42,
            2024,
            &baselines(Decimal::ZERO),
            &selections,
            EmissionMetric::TotW2wCo2,
        );
        assert!(run.records.is_empty());
        assert_eq!(run.failures.len(), 2);
        assert_eq!(run.failures[0].quarter, Quarter::Q1);
        assert_eq!(run.failures[0].error, CoreError::DivisionByZero);
    }

    #[test]
    fn metric_selects_the_total() {
        let run = build_quarter_deviations(
            42,
            2024,
            &baselines(dec!(10)),
            &[selection(Quarter::Q1, Some(dec!(12)))],
            EmissionMetric::TotT2wCo2,
        );
        // Tank-to-wake total is zero in the fixture.
        assert_eq!(run.records[0].actual_emission, Decimal::ZERO);
        assert_eq!(run.records[0].deviation_percentage, dec!(-100));
    }
}
