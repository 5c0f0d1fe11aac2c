//! One recalculation pass over the fleet.
//!
//! For every selected vessel the engine computes the year's quarterly
//! deviations and each record is upserted into the deviation table. A vessel
//! that cannot be calculated is logged and skipped; the rest of the fleet
//! still runs. Cancellation is checked between vessels.

use ppscc_core::engine::DeviationEngine;
use ppscc_core::types::DbId;
use ppscc_db::capabilities::StoreLookups;
use ppscc_db::repositories::{DeviationRepo, VesselRepo};
use ppscc_db::Database;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::config::WorkerConfig;

/// Counts reported after a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecalcSummary {
    /// Vessels whose deviations were computed (possibly with quarter failures).
    pub vessels_processed: usize,
    /// Vessels that aborted, e.g. unknown id or no reference lines.
    pub vessels_skipped: usize,
    pub records_written: usize,
    pub quarter_failures: usize,
    /// Set when the pass stopped early on cancellation.
    pub cancelled: bool,
}

/// Recalculate deviations for `config.year`.
///
/// Runs the configured vessel ids in the given order, or every vessel in
/// name order when none are configured.
pub async fn recalculate(
    db: &Database,
    config: &WorkerConfig,
    cancel: &CancellationToken,
) -> RecalcSummary {
    let lookups = StoreLookups::new(db).with_default_capacity(config.default_capacity);
    let engine = DeviationEngine::new(&lookups, &lookups, &lookups).with_metric(config.metric);

    let vessel_ids: Vec<DbId> = if config.vessel_ids.is_empty() {
        VesselRepo::list_all(db).await.into_iter().map(|v| v.id).collect()
    } else {
        config.vessel_ids.clone()
    };

    tracing::info!(
        year = config.year,
        metric = %config.metric,
        vessels = vessel_ids.len(),
        "Recalculation started",
    );

    let mut summary = RecalcSummary::default();

    for vessel_id in vessel_ids {
        if cancel.is_cancelled() {
            tracing::info!("Recalculation cancelled, skipping remaining vessels");
            summary.cancelled = true;
            break;
        }

        let run = match engine.compute_deviations(vessel_id, config.year).await {
            Ok(run) => run,
            Err(e) => {
                tracing::warn!(vessel_id, error = %e, "Skipping vessel");
                summary.vessels_skipped += 1;
                continue;
            }
        };

        for failure in &run.failures {
            tracing::warn!(
                vessel_id,
                quarter = %failure.quarter,
                quarter_end = %failure.quarter_end,
                error = %failure.error,
                "Quarter deviation could not be computed",
            );
        }

        for record in &run.records {
            DeviationRepo::upsert(db, record).await;
        }

        tracing::debug!(
            vessel_id,
            records = run.records.len(),
            failures = run.failures.len(),
            "Vessel recalculated",
        );
        summary.vessels_processed += 1;
        summary.records_written += run.records.len();
        summary.quarter_failures += run.failures.len();
    }

    tracing::info!(
        processed = summary.vessels_processed,
        skipped = summary.vessels_skipped,
        records = summary.records_written,
        quarter_failures = summary.quarter_failures,
        cancelled = summary.cancelled,
        "Recalculation finished",
    );
    summary
}
