//! Repository for vessels.

use ppscc_core::types::DbId;

use crate::models::vessel::{UpsertVessel, Vessel};
use crate::Database;

/// Provides query operations for vessels.
pub struct VesselRepo;

impl VesselRepo {
    /// Insert a vessel, or update name/type/capacity when the IMO number
    /// already exists. New vessels get the next sequential id.
    pub async fn upsert_by_imo(db: &Database, input: UpsertVessel) -> Vessel {
        let mut table = db.vessels.write().await;

        if let Some(id) = table.by_imo.get(&input.imo_no).copied() {
            if let Some(existing) = table.rows.get_mut(&id) {
                existing.name = input.name;
                existing.vessel_type = input.vessel_type;
                existing.capacity = input.capacity;
                return existing.clone();
            }
        }

        table.next_id += 1;
        let vessel = Vessel {
            id: table.next_id,
            imo_no: input.imo_no,
            name: input.name,
            vessel_type: input.vessel_type,
            capacity: input.capacity,
        };
        table.by_imo.insert(vessel.imo_no, vessel.id);
        table.rows.insert(vessel.id, vessel.clone());
        vessel
    }

    pub async fn find_by_id(db: &Database, id: DbId) -> Option<Vessel> {
        db.vessels.read().await.rows.get(&id).cloned()
    }

    pub async fn find_by_imo(db: &Database, imo_no: i64) -> Option<Vessel> {
        let table = db.vessels.read().await;
        table
            .by_imo
            .get(&imo_no)
            .and_then(|id| table.rows.get(id))
            .cloned()
    }

    /// All vessels ordered by name (then id).
    pub async fn list_all(db: &Database) -> Vec<Vessel> {
        let mut vessels: Vec<Vessel> = db.vessels.read().await.rows.values().cloned().collect();
        vessels.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        vessels
    }
}
