//! Repository for computed deviations.
//!
//! Rows are keyed by `(vessel_id, quarter)`; recalculating a quarter
//! overwrites its row instead of adding another.

use chrono::Utc;
use ppscc_core::deviation::DeviationRecord;
use ppscc_core::types::DbId;

use crate::models::deviation::{DeviationWithVessel, StoredDeviation};
use crate::Database;

/// Provides query operations for deviations.
pub struct DeviationRepo;

impl DeviationRepo {
    /// Insert a record, or overwrite the computed values of an existing
    /// `(vessel_id, quarter)` row. `created_at` survives the update.
    pub async fn upsert(db: &Database, record: &DeviationRecord) -> StoredDeviation {
        let now = Utc::now();
        let key = (record.vessel_id, record.quarter.clone());
        let mut table = db.deviations.write().await;

        let stored = table
            .entry(key)
            .and_modify(|row| {
                row.record.actual_emission = record.actual_emission;
                row.record.baseline_emission = record.baseline_emission;
                row.record.deviation_percentage = record.deviation_percentage;
                row.record.baselines = record.baselines.clone();
                row.updated_at = now;
            })
            .or_insert_with(|| StoredDeviation {
                record: record.clone(),
                created_at: now,
                updated_at: now,
            });
        stored.clone()
    }

    /// A vessel's deviations ordered by year then quarter.
    pub async fn list_by_vessel(
        db: &Database,
        vessel_id: DbId,
        year: Option<i32>,
    ) -> Vec<StoredDeviation> {
        let mut rows: Vec<StoredDeviation> = db
            .deviations
            .read()
            .await
            .values()
            .filter(|d| d.record.vessel_id == vessel_id)
            .filter(|d| year.map_or(true, |y| d.record.year == y))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            (a.record.year, &a.record.quarter).cmp(&(b.record.year, &b.record.quarter))
        });
        rows
    }

    /// Every deviation joined with its vessel, ordered by vessel name, year
    /// and quarter. Rows whose vessel no longer exists are left out.
    pub async fn list_all(db: &Database, year: Option<i32>) -> Vec<DeviationWithVessel> {
        let vessels = db.vessels.read().await;
        let deviations = db.deviations.read().await;

        let mut rows: Vec<DeviationWithVessel> = deviations
            .values()
            .filter(|d| year.map_or(true, |y| d.record.year == y))
            .filter_map(|d| {
                let vessel = vessels.rows.get(&d.record.vessel_id)?;
                Some(DeviationWithVessel {
                    vessel_name: vessel.name.clone(),
                    imo_no: vessel.imo_no,
                    deviation: d.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            let key = |r: &DeviationWithVessel| {
                (
                    r.vessel_name.clone(),
                    r.deviation.record.year,
                    r.deviation.record.quarter.clone(),
                )
            };
            key(a).cmp(&key(b))
        });
        rows
    }

    pub async fn count(db: &Database) -> usize {
        db.deviations.read().await.len()
    }
}
