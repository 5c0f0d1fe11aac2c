//! End-to-end deviation calculation for one vessel and one year.

use crate::baseline::{compute_baselines, BaselineSet};
use crate::deviation::{build_quarter_deviations, DeviationRun};
use crate::emission::EmissionMetric;
use crate::error::CoreError;
use crate::ports::{QuarterEmissionLookup, ReferenceLineLookup, VesselLookup};
use crate::trajectory::PP_CATEGORY;
use crate::types::DbId;
use crate::validation::validate_year;

/// Computes quarterly deviations using three lookup capabilities.
///
/// Holds no mutable state; one engine can serve concurrent calls.
pub struct DeviationEngine<'a, V: ?Sized, R: ?Sized, Q: ?Sized> {
    vessels: &'a V,
    reference_lines: &'a R,
    emissions: &'a Q,
    metric: EmissionMetric,
}

impl<'a, V, R, Q> DeviationEngine<'a, V, R, Q>
where
    V: VesselLookup + ?Sized,
    R: ReferenceLineLookup + ?Sized,
    Q: QuarterEmissionLookup + ?Sized,
{
    pub fn new(vessels: &'a V, reference_lines: &'a R, emissions: &'a Q) -> Self {
        Self {
            vessels,
            reference_lines,
            emissions,
            metric: EmissionMetric::default(),
        }
    }

    /// Compare against `metric` instead of well-to-wake CO2e.
    pub fn with_metric(mut self, metric: EmissionMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn metric(&self) -> EmissionMetric {
        self.metric
    }

    /// Baseline set for a vessel's class, year and capacity.
    ///
    /// Fails with `VesselNotFound` or `ReferenceDataMissing` when there is no
    /// basis for a baseline at all.
    pub async fn vessel_baselines(
        &self,
        vessel_id: DbId,
        year: i32,
    ) -> Result<BaselineSet, CoreError> {
        validate_year(year)?;

        let vessel = self
            .vessels
            .find_vessel(vessel_id)
            .await?
            .ok_or(CoreError::VesselNotFound(vessel_id))?;

        let rows = self
            .reference_lines
            .reference_lines(vessel.vessel_type, PP_CATEGORY)
            .await?;
        if rows.is_empty() {
            return Err(CoreError::ReferenceDataMissing {
                vessel_type: vessel.vessel_type,
                category: PP_CATEGORY,
            });
        }

        compute_baselines(&rows, year, vessel.capacity)
    }

    /// Deviation records for every resolved quarter of `year`.
    ///
    /// Vessel and reference-data failures abort the call. Per-quarter
    /// arithmetic failures land in [`DeviationRun::failures`].
    pub async fn compute_deviations(
        &self,
        vessel_id: DbId,
        year: i32,
    ) -> Result<DeviationRun, CoreError> {
        let baselines = self.vessel_baselines(vessel_id, year).await?;
        let selections = self
            .emissions
            .quarter_end_emissions(vessel_id, year)
            .await?;

        Ok(build_quarter_deviations(
            vessel_id,
            year,
            &baselines,
            &selections,
            self.metric,
        ))
    }
}
