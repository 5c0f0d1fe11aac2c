//! Repository for daily emission observations.

use ppscc_core::emission::EmissionObservation;
use ppscc_core::error::CoreError;
use ppscc_core::quarter::{latest_at_or_before, resolve_quarter_end_emissions, QuarterEndSelection};
use ppscc_core::types::{DbId, Timestamp};

use crate::Database;

/// Default page size for [`EmissionRepo::list_by_vessel`].
pub const DEFAULT_EMISSION_LIMIT: usize = 100;

/// Provides query operations for emission observations.
pub struct EmissionRepo;

impl EmissionRepo {
    /// Insert or replace an observation by its emission id.
    pub async fn upsert(db: &Database, observation: EmissionObservation) {
        db.emissions.write().await.insert(observation.id, observation);
    }

    /// A vessel's observations, newest `to_utc` first.
    ///
    /// `limit` defaults to [`DEFAULT_EMISSION_LIMIT`].
    pub async fn list_by_vessel(
        db: &Database,
        vessel_id: DbId,
        limit: Option<usize>,
    ) -> Vec<EmissionObservation> {
        let mut rows = Self::all_for_vessel(db, vessel_id).await;
        rows.sort_by(|a, b| b.to_utc.cmp(&a.to_utc));
        rows.truncate(limit.unwrap_or(DEFAULT_EMISSION_LIMIT));
        rows
    }

    /// The newest observation of a vessel ending at or before `cutoff`.
    pub async fn find_latest_at_or_before(
        db: &Database,
        vessel_id: DbId,
        cutoff: Timestamp,
    ) -> Option<EmissionObservation> {
        let rows = Self::all_for_vessel(db, vessel_id).await;
        latest_at_or_before(&rows, cutoff).cloned()
    }

    /// The four quarter-end selections of `year` for a vessel.
    pub async fn quarter_end_emissions(
        db: &Database,
        vessel_id: DbId,
        year: i32,
    ) -> Result<Vec<QuarterEndSelection>, CoreError> {
        let rows = Self::all_for_vessel(db, vessel_id).await;
        resolve_quarter_end_emissions(&rows, year)
    }

    pub async fn count(db: &Database) -> usize {
        db.emissions.read().await.len()
    }

    /// Every observation of a vessel in emission-id order.
    async fn all_for_vessel(db: &Database, vessel_id: DbId) -> Vec<EmissionObservation> {
        db.emissions
            .read()
            .await
            .values()
            .filter(|o| o.vessel_id == vessel_id)
            .cloned()
            .collect()
    }
}
