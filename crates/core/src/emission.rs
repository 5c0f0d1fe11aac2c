//! Emission observations as read by the deviation calculator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::decimal::Decimal;
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Per-pollutant totals of one reporting interval.
///
/// Totals missing from the source log are recorded as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionTotals {
    /// Tank-to-wake CO2.
    pub tot_t2w_co2: Decimal,
    /// Well-to-wake CO2 equivalent.
    pub tot_w2w_co2: Decimal,
    pub tot_sox: Decimal,
    pub tot_nox: Decimal,
    pub tot_pm: Decimal,
    pub tot_ch4: Decimal,
    pub tot_n2o: Decimal,
}

/// One reporting interval of a vessel's emission log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionObservation {
    pub id: DbId,
    pub vessel_id: DbId,
    pub log_id: i64,
    pub from_utc: Timestamp,
    pub to_utc: Timestamp,
    pub totals: EmissionTotals,
}

impl EmissionObservation {
    /// The total selected by `metric`.
    pub fn total(&self, metric: EmissionMetric) -> Decimal {
        let t = &self.totals;
        match metric {
            EmissionMetric::TotT2wCo2 => t.tot_t2w_co2,
            EmissionMetric::TotW2wCo2 => t.tot_w2w_co2,
            EmissionMetric::TotSox => t.tot_sox,
            EmissionMetric::TotNox => t.tot_nox,
            EmissionMetric::TotPm => t.tot_pm,
            EmissionMetric::TotCh4 => t.tot_ch4,
            EmissionMetric::TotN2o => t.tot_n2o,
        }
    }
}

// ---------------------------------------------------------------------------
// Metric selection
// ---------------------------------------------------------------------------

/// Which emission total is compared against the baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionMetric {
    TotT2wCo2,
    #[default]
    TotW2wCo2,
    TotSox,
    TotNox,
    TotPm,
    TotCh4,
    TotN2o,
}

impl EmissionMetric {
    /// Stable identifier used in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TotT2wCo2 => "tot_t2w_co2",
            Self::TotW2wCo2 => "tot_w2w_co2",
            Self::TotSox => "tot_sox",
            Self::TotNox => "tot_nox",
            Self::TotPm => "tot_pm",
            Self::TotCh4 => "tot_ch4",
            Self::TotN2o => "tot_n2o",
        }
    }
}

impl fmt::Display for EmissionMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmissionMetric {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "tot_t2w_co2" => Ok(Self::TotT2wCo2),
            "tot_w2w_co2" => Ok(Self::TotW2wCo2),
            "tot_sox" => Ok(Self::TotSox),
            "tot_nox" => Ok(Self::TotNox),
            "tot_pm" => Ok(Self::TotPm),
            "tot_ch4" => Ok(Self::TotCh4),
            "tot_n2o" => Ok(Self::TotN2o),
            other => Err(CoreError::Validation(format!(
                "unknown emission metric '{other}'"
            ))),
        }
    }
}
