//! Lookup capabilities the deviation engine depends on.
//!
//! Each capability is a separate trait so stores can be swapped
//! independently; tests substitute in-memory fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::decimal::Decimal;
use crate::error::CoreError;
use crate::quarter::QuarterEndSelection;
use crate::trajectory::CoefficientRow;
use crate::types::{DbId, VesselTypeId};

/// What the engine needs to know about a vessel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VesselProfile {
    pub id: DbId,
    pub name: String,
    pub vessel_type: VesselTypeId,
    /// Sizing metric used as the capacity term, e.g. deadweight tonnage.
    pub capacity: Decimal,
}

#[async_trait]
pub trait VesselLookup: Send + Sync {
    /// `Ok(None)` when no vessel has this id.
    async fn find_vessel(&self, vessel_id: DbId) -> Result<Option<VesselProfile>, CoreError>;
}

#[async_trait]
pub trait ReferenceLineLookup: Send + Sync {
    /// All reference lines of `category` for a vessel type, in stored order.
    async fn reference_lines(
        &self,
        vessel_type: VesselTypeId,
        category: &str,
    ) -> Result<Vec<CoefficientRow>, CoreError>;
}

#[async_trait]
pub trait QuarterEmissionLookup: Send + Sync {
    /// The four quarter-end selections of `year` for a vessel.
    async fn quarter_end_emissions(
        &self,
        vessel_id: DbId,
        year: i32,
    ) -> Result<Vec<QuarterEndSelection>, CoreError>;
}
