//! Repositories over the in-memory [`Database`](crate::Database).
//!
//! Each repository is a zero-sized struct whose async methods take the
//! database by reference.

pub mod deviation_repo;
pub mod emission_repo;
pub mod reference_line_repo;
pub mod vessel_repo;

pub use deviation_repo::DeviationRepo;
pub use emission_repo::EmissionRepo;
pub use reference_line_repo::ReferenceLineRepo;
pub use vessel_repo::VesselRepo;
