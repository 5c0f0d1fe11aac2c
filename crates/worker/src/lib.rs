//! Recalculation worker: loads the fixture store, recomputes quarterly
//! deviations for one year and reports what it wrote.

pub mod config;
pub mod error;
pub mod recalc;

use ppscc_db::models::deviation::DeviationWithVessel;
use ppscc_db::repositories::DeviationRepo;
use ppscc_db::seed::{self, LoadSummary};
use ppscc_db::Database;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::recalc::RecalcSummary;

/// Everything one invocation produces.
#[derive(Debug, Serialize)]
pub struct WorkerReport {
    pub year: i32,
    /// What the fixture loader read and skipped.
    pub load: LoadSummary,
    pub summary: RecalcSummary,
    pub deviations: Vec<DeviationWithVessel>,
}

/// Load fixtures from `config.data_dir`, recalculate, and collect the stored
/// deviations for the year.
pub async fn run(
    config: &WorkerConfig,
    cancel: &CancellationToken,
) -> Result<WorkerReport, WorkerError> {
    let db = Database::new();
    let load = seed::load_dir(&db, &config.data_dir).await?;

    let summary = recalc::recalculate(&db, config, cancel).await;
    let deviations = DeviationRepo::list_all(&db, Some(config.year)).await;

    Ok(WorkerReport {
        year: config.year,
        load,
        summary,
        deviations,
    })
}
