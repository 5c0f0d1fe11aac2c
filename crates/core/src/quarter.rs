//! Calendar quarters and quarter-end emission resolution.
//!
//! A quarter is represented by the most recent observation whose interval
//! ended at or before the quarter's cut-off, `00:00 UTC` on its last day.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::emission::EmissionObservation;
use crate::error::CoreError;
use crate::types::Timestamp;
use crate::validation::validate_year;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    /// All quarters in calendar order.
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    pub fn label(self) -> &'static str {
        match self {
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
        }
    }

    /// `(month, day)` of the quarter's last day.
    pub fn end_month_day(self) -> (u32, u32) {
        match self {
            Self::Q1 => (3, 31),
            Self::Q2 => (6, 30),
            Self::Q3 => (9, 30),
            Self::Q4 => (12, 31),
        }
    }

    /// Last calendar day of the quarter in `year`.
    pub fn end_date(self, year: i32) -> Result<NaiveDate, CoreError> {
        validate_year(year)?;
        let (month, day) = self.end_month_day();
        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            CoreError::Validation(format!("no {} end date in year {year}", self.label()))
        })
    }

    /// Latest `to_utc` an observation may have to represent this quarter.
    pub fn cutoff(self, year: i32) -> Result<Timestamp, CoreError> {
        Ok(self.end_date(year)?.and_time(NaiveTime::MIN).and_utc())
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Composite quarter key, e.g. `"2024-Q2"`.
pub fn quarter_key(year: i32, quarter: Quarter) -> String {
    format!("{year}-{}", quarter.label())
}

/// One quarter's representative observation, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterEndSelection {
    pub quarter: Quarter,
    pub quarter_end: NaiveDate,
    pub emission: Option<EmissionObservation>,
}

/// Pick the latest observation with `to_utc <= cutoff`.
///
/// Ties on `to_utc` go to the observation that comes later in `observations`.
pub fn latest_at_or_before(
    observations: &[EmissionObservation],
    cutoff: Timestamp,
) -> Option<&EmissionObservation> {
    observations
        .iter()
        .filter(|o| o.to_utc <= cutoff)
        .max_by_key(|o| o.to_utc)
}

/// Resolve all four quarters of `year` from one vessel's observations.
///
/// Always returns four selections in Q1..Q4 order; quarters with no
/// qualifying observation carry `emission: None`.
pub fn resolve_quarter_end_emissions(
    observations: &[EmissionObservation],
    year: i32,
) -> Result<Vec<QuarterEndSelection>, CoreError> {
    Quarter::ALL
        .into_iter()
        .map(|quarter| {
            let cutoff = quarter.cutoff(year)?;
            Ok(QuarterEndSelection {
                quarter,
                quarter_end: quarter.end_date(year)?,
                emission: latest_at_or_before(observations, cutoff).cloned(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
