//! Engine lookup capabilities backed by the in-memory store.

use async_trait::async_trait;
use ppscc_core::decimal::Decimal;
use ppscc_core::error::CoreError;
use ppscc_core::ports::{QuarterEmissionLookup, ReferenceLineLookup, VesselLookup, VesselProfile};
use ppscc_core::quarter::QuarterEndSelection;
use ppscc_core::trajectory::CoefficientRow;
use ppscc_core::types::{DbId, VesselTypeId};

use crate::repositories::{EmissionRepo, ReferenceLineRepo, VesselRepo};
use crate::Database;

/// Adapts a [`Database`] to the three engine capabilities.
///
/// Vessels without a recorded capacity are an error unless a fallback
/// capacity is configured; every use of the fallback is logged.
#[derive(Debug, Clone, Copy)]
pub struct StoreLookups<'a> {
    db: &'a Database,
    default_capacity: Option<Decimal>,
}

impl<'a> StoreLookups<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            default_capacity: None,
        }
    }

    pub fn with_default_capacity(mut self, capacity: Option<Decimal>) -> Self {
        self.default_capacity = capacity;
        self
    }
}

#[async_trait]
impl VesselLookup for StoreLookups<'_> {
    async fn find_vessel(&self, vessel_id: DbId) -> Result<Option<VesselProfile>, CoreError> {
        let Some(vessel) = VesselRepo::find_by_id(self.db, vessel_id).await else {
            return Ok(None);
        };

        let capacity = match (vessel.capacity, self.default_capacity) {
            (Some(capacity), _) => capacity,
            (None, Some(fallback)) => {
                tracing::warn!(
                    vessel_id,
                    imo_no = vessel.imo_no,
                    capacity = %fallback,
                    "Vessel has no capacity, using configured default",
                );
                fallback
            }
            (None, None) => {
                return Err(CoreError::Validation(format!(
                    "vessel {vessel_id} has no capacity and no default capacity is configured"
                )));
            }
        };

        Ok(Some(VesselProfile {
            id: vessel.id,
            name: vessel.name,
            vessel_type: vessel.vessel_type,
            capacity,
        }))
    }
}

#[async_trait]
impl ReferenceLineLookup for StoreLookups<'_> {
    async fn reference_lines(
        &self,
        vessel_type: VesselTypeId,
        category: &str,
    ) -> Result<Vec<CoefficientRow>, CoreError> {
        let lines =
            ReferenceLineRepo::list_by_type_and_category(self.db, vessel_type, category).await;
        Ok(lines.iter().map(|l| l.coefficients()).collect())
    }
}

#[async_trait]
impl QuarterEmissionLookup for StoreLookups<'_> {
    async fn quarter_end_emissions(
        &self,
        vessel_id: DbId,
        year: i32,
    ) -> Result<Vec<QuarterEndSelection>, CoreError> {
        EmissionRepo::quarter_end_emissions(self.db, vessel_id, year).await
    }
}
