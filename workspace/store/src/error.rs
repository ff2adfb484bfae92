use thiserror::Error;

use model::entities::EntityKind;

/// Error types for ledger store operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// A write to the backing store was rejected
    #[error("write to {kind} failed: {reason}")]
    WriteFailed { kind: EntityKind, reason: String },

    /// A read from the backing store failed
    #[error("read from {kind} failed: {reason}")]
    ReadFailed { kind: EntityKind, reason: String },

    /// A subscription could not be established
    #[error("subscription to {kind} for account {account_id} failed: {reason}")]
    SubscriptionFailed {
        kind: EntityKind,
        account_id: String,
        reason: String,
    },

    /// The backing store itself is unusable
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Type alias for Result with StorageError
pub type Result<T> = std::result::Result<T, StorageError>;
