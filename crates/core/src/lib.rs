//! Baseline & deviation engine for PPSCC emission trajectories.
//!
//! Pure domain logic: exact decimal arithmetic, reference trajectory
//! selection, baseline bands, quarter-end resolution and per-quarter
//! deviations. Data access is expressed through the traits in [`ports`].

pub mod baseline;
pub mod decimal;
pub mod deviation;
pub mod emission;
pub mod engine;
pub mod error;
pub mod ports;
pub mod quarter;
pub mod trajectory;
pub mod types;
pub mod validation;
