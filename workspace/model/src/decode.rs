//! Decode step at the store boundary.
//!
//! Snapshot documents arrive as raw JSON values. Nothing loosely typed may
//! cross into aggregation: every document is deserialized into its typed
//! entity and validated, failing with [`ValidationError`] on any mismatch.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::entities::EntityKind;
use crate::error::ValidationError;

/// Behavior shared by entities that live as documents in the ledger store.
pub trait Document: DeserializeOwned {
    /// The entity kind this document type corresponds to.
    const KIND: EntityKind;

    /// Field-level constraint checks, run after deserialization and before
    /// an entity is accepted into a working set.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Decodes a single raw document into a typed, validated entity.
pub fn decode_document<T: Document>(document: Value) -> Result<T, ValidationError> {
    let entity: T = serde_json::from_value(document)
        .map_err(|source| ValidationError::MalformedDocument {
            kind: T::KIND,
            source,
        })?;
    entity.validate()?;
    Ok(entity)
}

/// Decodes a full-collection snapshot, failing on the first bad document.
pub fn decode_collection<T: Document>(documents: Vec<Value>) -> Result<Vec<T>, ValidationError> {
    documents.into_iter().map(decode_document).collect()
}
