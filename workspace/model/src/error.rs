use rust_decimal::Decimal;
use thiserror::Error;

use crate::entities::EntityKind;

/// Error types for entity validation and document decoding
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A money amount was negative where only non-negative values are allowed
    #[error("amount for {field} must be non-negative, got {value}")]
    NegativeAmount {
        field: &'static str,
        value: Decimal,
    },

    /// A required text field was missing or empty
    #[error("required field {0} is empty")]
    MissingField(&'static str),

    /// An alert threshold outside the 0..=100 percent range
    #[error("alert threshold must be between 0 and 100, got {0}")]
    ThresholdOutOfRange(Decimal),

    /// A savings goal title that already exists for this owner
    #[error("a savings goal titled '{0}' already exists")]
    DuplicateGoalTitle(String),

    /// A snapshot document that does not decode into the expected entity shape
    #[error("malformed {kind} document: {source}")]
    MalformedDocument {
        kind: EntityKind,
        #[source]
        source: serde_json::Error,
    },
}

/// Type alias for Result with ValidationError
pub type Result<T> = std::result::Result<T, ValidationError>;
