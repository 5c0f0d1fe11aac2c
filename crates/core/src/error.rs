use crate::types::{DbId, VesselTypeId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Vessel not found: {0}")]
    VesselNotFound(DbId),

    #[error("No {category} reference lines for vessel type {vessel_type}")]
    ReferenceDataMissing {
        vessel_type: VesselTypeId,
        category: &'static str,
    },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Malformed coefficient row {row}: field `{field}` is not a number ({value})")]
    MalformedCoefficientRow {
        row: String,
        field: &'static str,
        value: String,
    },

    #[error("Arithmetic overflow while computing {0}")]
    ArithmeticOverflow(&'static str),

    #[error("Validation failed: {0}")]
    Validation(String),
}
