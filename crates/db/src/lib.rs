//! In-memory data access for the deviation engine.
//!
//! [`Database`] holds one table per entity behind `tokio` read/write locks.
//! Repositories are stateless and take the database by reference, the same
//! way they would take a connection pool.

use std::collections::{BTreeMap, HashMap};

use ppscc_core::emission::EmissionObservation;
use ppscc_core::types::DbId;
use tokio::sync::RwLock;

pub mod capabilities;
pub mod error;
pub mod models;
pub mod repositories;
pub mod seed;

use models::deviation::StoredDeviation;
use models::reference_line::ReferenceLine;
use models::vessel::Vessel;

/// Vessel rows plus the IMO uniqueness index and id sequence.
#[derive(Debug, Default)]
pub(crate) struct VesselTable {
    pub(crate) rows: BTreeMap<DbId, Vessel>,
    pub(crate) by_imo: HashMap<i64, DbId>,
    pub(crate) next_id: DbId,
}

/// The whole store. Cheap to create; share it behind an `Arc` if needed.
#[derive(Debug, Default)]
pub struct Database {
    pub(crate) vessels: RwLock<VesselTable>,
    /// Keyed by source row id, so iteration follows row order.
    pub(crate) reference_lines: RwLock<BTreeMap<DbId, ReferenceLine>>,
    /// Keyed by emission id.
    pub(crate) emissions: RwLock<BTreeMap<DbId, EmissionObservation>>,
    /// Keyed by `(vessel_id, "{year}-{Qn}")`.
    pub(crate) deviations: RwLock<BTreeMap<(DbId, String), StoredDeviation>>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }
}
