//! Stored deviation rows.

use ppscc_core::deviation::DeviationRecord;
use ppscc_core::types::Timestamp;
use serde::Serialize;

/// A deviation record as kept in the store, keyed by vessel and quarter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredDeviation {
    #[serde(flatten)]
    pub record: DeviationRecord,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A stored deviation joined with its vessel's name, for fleet listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviationWithVessel {
    pub vessel_name: String,
    pub imo_no: i64,
    #[serde(flatten)]
    pub deviation: StoredDeviation,
}
