//! PPSCC reference line entity.

use ppscc_core::decimal::Decimal;
use ppscc_core::trajectory::CoefficientRow;
use ppscc_core::types::{DbId, VesselTypeId};
use serde::Serialize;

/// One stored reference curve for a vessel type, size band and category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceLine {
    /// Source row id.
    pub id: DbId,
    pub category: String,
    pub vessel_type_id: VesselTypeId,
    pub size: String,
    pub traj: String,
    pub a: Option<Decimal>,
    pub b: Option<Decimal>,
    pub c: Option<Decimal>,
    pub d: Option<Decimal>,
    pub e: Option<Decimal>,
}

impl ReferenceLine {
    /// The coefficients as consumed by the baseline evaluator.
    pub fn coefficients(&self) -> CoefficientRow {
        CoefficientRow {
            trajectory: self.traj.clone(),
            a: self.a,
            b: self.b,
            c: self.c,
            d: self.d,
            e: self.e,
        }
    }
}
