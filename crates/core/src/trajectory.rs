//! Reference trajectory selection.
//!
//! A vessel class carries several PPSCC reference lines. Only the minimum
//! (`"MIN"`) and striving (`"STR"`) trajectories feed the baseline; every
//! other tag is ignored.

use serde::{Deserialize, Serialize};

use crate::decimal::Decimal;

/// Reference-line category holding the Poseidon Principles trajectories.
pub const PP_CATEGORY: &str = "PP";

/// Tag of the minimum (compliance) trajectory.
pub const MIN_TAG: &str = "MIN";
/// Tag of the striving (aspirational) trajectory.
pub const STRIVING_TAG: &str = "STR";

// ---------------------------------------------------------------------------
// Coefficient rows
// ---------------------------------------------------------------------------

/// One regulatory reference curve: `(a·y³ + b·y² + c·y + d) · capacity^e`.
///
/// Missing coefficients are kept as `None` and evaluate as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoefficientRow {
    pub trajectory: String,
    pub a: Option<Decimal>,
    pub b: Option<Decimal>,
    pub c: Option<Decimal>,
    pub d: Option<Decimal>,
    pub e: Option<Decimal>,
}

impl CoefficientRow {
    /// The all-zero row used when no reference line matches a trajectory.
    pub fn zero() -> Self {
        Self {
            trajectory: String::new(),
            a: Some(Decimal::ZERO),
            b: Some(Decimal::ZERO),
            c: Some(Decimal::ZERO),
            d: Some(Decimal::ZERO),
            e: Some(Decimal::ZERO),
        }
    }
}

/// The two trajectories of interest, normalized from a row's tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrajectoryKind {
    Minimum,
    Striving,
}

impl TrajectoryKind {
    /// Match a raw tag. Surrounding whitespace is ignored; case is not.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            MIN_TAG => Some(Self::Minimum),
            STRIVING_TAG => Some(Self::Striving),
            _ => None,
        }
    }
}

/// The selected minimum and striving rows for one vessel class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrajectoryPair {
    pub minimum: CoefficientRow,
    pub striving: CoefficientRow,
}

impl Default for TrajectoryPair {
    fn default() -> Self {
        Self {
            minimum: CoefficientRow::zero(),
            striving: CoefficientRow::zero(),
        }
    }
}

/// Reduce an ordered sequence of rows into the minimum/striving pair.
///
/// The last row carrying a tag wins. Slots with no matching row stay at
/// [`CoefficientRow::zero`]. An empty input is not an error here; callers
/// that fetched zero rows report `ReferenceDataMissing` themselves.
pub fn select_trajectories<'a, I>(rows: I) -> TrajectoryPair
where
    I: IntoIterator<Item = &'a CoefficientRow>,
{
    rows.into_iter()
        .fold(TrajectoryPair::default(), |mut pair, row| {
            match TrajectoryKind::from_tag(&row.trajectory) {
                Some(TrajectoryKind::Minimum) => pair.minimum = row.clone(),
                Some(TrajectoryKind::Striving) => pair.striving = row.clone(),
                None => {}
            }
            pair
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn row(tag: &str, d: Decimal) -> CoefficientRow {
        CoefficientRow {
            trajectory: tag.to_string(),
            d: Some(d),
            ..CoefficientRow::default()
        }
    }

    #[test]
    fn tags_are_trimmed() {
        assert_eq!(TrajectoryKind::from_tag(" MIN "), Some(TrajectoryKind::Minimum));
        assert_eq!(TrajectoryKind::from_tag("STR\t"), Some(TrajectoryKind::Striving));
    }

    #[test]
    fn tags_are_case_sensitive() {
        assert_eq!(TrajectoryKind::from_tag("min"), None);
        assert_eq!(TrajectoryKind::from_tag("Str"), None);
    }

    #[test]
    fn selects_both_trajectories() {
        let rows = vec![row("MIN", dec!(10)), row("STR", dec!(8))];
        let pair = select_trajectories(&rows);
        assert_eq!(pair.minimum.d, Some(dec!(10)));
        assert_eq!(pair.striving.d, Some(dec!(8)));
    }

    #[test]
    fn later_duplicate_wins() {
        let rows = vec![row("MIN", dec!(10)), row("STR", dec!(8)), row("MIN ", dec!(12))];
        let pair = select_trajectories(&rows);
        assert_eq!(pair.minimum.d, Some(dec!(12)));
    }

    #[test]
    fn unknown_tags_are_ignored() {
        let rows = vec![row("YX_LOW", dec!(1)), row("MIN", dec!(10)), row("", dec!(2))];
        let pair = select_trajectories(&rows);
        assert_eq!(pair.minimum.d, Some(dec!(10)));
        assert_eq!(pair.striving, CoefficientRow::zero());
    }

    #[test]
    fn empty_input_yields_zero_rows() {
        let pair = select_trajectories(&Vec::<CoefficientRow>::new());
        assert_eq!(pair, TrajectoryPair::default());
    }
}
