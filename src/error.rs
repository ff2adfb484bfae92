use thiserror::Error;

use model::entities::EntityKind;
use model::ValidationError;
use store::StorageError;

/// Error types for coordinator operations
#[derive(Error, Debug)]
pub enum CoordinatorError {
    /// The mutation was rejected before touching the working set
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The ledger store refused a persistence call
    #[error("storage failed: {0}")]
    Storage(#[from] StorageError),

    /// A remote subscription could not be established; aggregates go stale
    /// until resubscription succeeds
    #[error("subscription failed: {0}")]
    Subscription(String),

    /// An entity could not be serialized into a store document
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An operation that needs a selected account ran without one
    #[error("no bank account is selected")]
    NoAccountSelected,

    /// An id that does not resolve to a known entity in the working set
    #[error("unknown {kind}: {id}")]
    UnknownEntity { kind: EntityKind, id: String },
}

/// Type alias for Result with CoordinatorError
pub type Result<T> = std::result::Result<T, CoordinatorError>;
