//! The ledger store boundary.
//!
//! Durable holder of raw entities, keyed by id and scoped by owner, with a
//! subscription mechanism for live collections. The contract models a remote
//! multi-user real-time store: writes are acknowledged per document, and every
//! watched collection re-emits its full contents as a snapshot event after a
//! change (eventually consistent, at-least-once, per-collection FIFO).
//!
//! Documents cross this boundary as raw JSON values; typing happens in the
//! model crate's decode step, never here.

pub mod error;
pub mod memory;

pub use error::{Result, StorageError};
pub use memory::MemoryLedgerStore;

use async_trait::async_trait;
use model::entities::EntityKind;
use serde_json::Value;
use tokio::sync::mpsc;

/// A full-collection push for one watched scope.
///
/// A snapshot supersedes every earlier snapshot for the same collection; it
/// is a replacement, never a delta.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub kind: EntityKind,
    /// The bank account scope this snapshot was filtered to.
    pub account_id: String,
    /// The complete current contents of the watched collection.
    pub documents: Vec<Value>,
}

/// A live watch on one account-scoped collection.
///
/// Snapshots queue on an unbounded channel until pulled. Dropping the
/// subscription or calling [`CollectionSubscription::unsubscribe`] stops
/// delivery synchronously; the store prunes the dead watcher on its next
/// emit.
#[derive(Debug)]
pub struct CollectionSubscription {
    pub kind: EntityKind,
    pub account_id: String,
    receiver: mpsc::UnboundedReceiver<Snapshot>,
}

impl CollectionSubscription {
    pub(crate) fn new(
        kind: EntityKind,
        account_id: String,
        receiver: mpsc::UnboundedReceiver<Snapshot>,
    ) -> Self {
        Self {
            kind,
            account_id,
            receiver,
        }
    }

    /// Pulls the next queued snapshot without waiting.
    pub fn try_next(&mut self) -> Option<Snapshot> {
        self.receiver.try_recv().ok()
    }

    /// Waits for the next snapshot. Returns None once unsubscribed and
    /// drained.
    pub async fn next(&mut self) -> Option<Snapshot> {
        self.receiver.recv().await
    }

    /// Stops delivery. No snapshot queued after this call will ever be
    /// observed, including ones already in flight.
    pub fn unsubscribe(mut self) {
        self.receiver.close();
    }
}

/// Durable storage contract consumed by the consistency coordinator.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Creates or overwrites one entity document.
    async fn create_or_replace(
        &self,
        kind: EntityKind,
        owner: &str,
        id: &str,
        document: Value,
    ) -> Result<()>;

    /// Deletes one entity document. Deleting an id that is already gone is
    /// not an error.
    async fn delete(&self, kind: EntityKind, owner: &str, id: &str) -> Result<()>;

    /// Lists an owner's documents of one kind, optionally narrowed to a
    /// single bank account scope.
    async fn list_for_owner(
        &self,
        kind: EntityKind,
        owner: &str,
        account_scope: Option<&str>,
    ) -> Result<Vec<Value>>;

    /// Starts watching one account-scoped collection. The current contents
    /// are delivered as an immediate first snapshot.
    async fn subscribe(
        &self,
        owner: &str,
        account_id: &str,
        kind: EntityKind,
    ) -> Result<CollectionSubscription>;
}
