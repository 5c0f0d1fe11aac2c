//! Repository for PPSCC reference lines.

use ppscc_core::types::VesselTypeId;

use crate::models::reference_line::ReferenceLine;
use crate::Database;

/// Provides query operations for reference lines.
pub struct ReferenceLineRepo;

impl ReferenceLineRepo {
    /// Insert or replace a line by its source row id.
    pub async fn upsert(db: &Database, line: ReferenceLine) {
        db.reference_lines.write().await.insert(line.id, line);
    }

    /// Lines for a vessel type and category, in row-id order.
    pub async fn list_by_type_and_category(
        db: &Database,
        vessel_type_id: VesselTypeId,
        category: &str,
    ) -> Vec<ReferenceLine> {
        db.reference_lines
            .read()
            .await
            .values()
            .filter(|l| l.vessel_type_id == vessel_type_id && l.category == category)
            .cloned()
            .collect()
    }

    pub async fn count(db: &Database) -> usize {
        db.reference_lines.read().await.len()
    }
}
