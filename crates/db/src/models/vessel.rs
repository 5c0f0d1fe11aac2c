//! Vessel entity and input DTO.

use ppscc_core::decimal::Decimal;
use ppscc_core::types::{DbId, VesselTypeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vessel {
    pub id: DbId,
    pub imo_no: i64,
    pub name: String,
    pub vessel_type: VesselTypeId,
    /// Deadweight tonnage, when the source provides it.
    pub capacity: Option<Decimal>,
}

/// DTO for creating or updating a vessel by IMO number.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertVessel {
    pub imo_no: i64,
    pub name: String,
    pub vessel_type: VesselTypeId,
    pub capacity: Option<Decimal>,
}
