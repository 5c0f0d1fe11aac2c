/// All entity primary keys are 64-bit integers.
pub type DbId = i64;

/// Vessel type / class identifier shared by vessels and reference lines.
pub type VesselTypeId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
