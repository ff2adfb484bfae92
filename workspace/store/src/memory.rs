//! In-memory ledger store.
//!
//! Stands in for the remote real-time data store: every successful write
//! re-emits the full contents of each watched collection to its matching
//! subscribers, in write order. The same instance shared between two
//! sessions behaves like two devices on one multi-user store.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use model::entities::EntityKind;

use crate::error::{Result, StorageError};
use crate::{CollectionSubscription, LedgerStore, Snapshot};

/// The document field carrying the account scope. Incomes and expenses both
/// carry it; snapshots and scoped listings filter on it.
const ACCOUNT_SCOPE_FIELD: &str = "bank_account_id";

#[derive(Default)]
struct Inner {
    /// (owner, kind) -> id -> document. BTreeMap keeps listing order stable.
    collections: HashMap<(String, EntityKind), BTreeMap<String, Value>>,
    watchers: Vec<Watcher>,
    /// Test hook: when set, the next write is rejected and the flag clears.
    fail_next_write: bool,
}

struct Watcher {
    owner: String,
    account_id: String,
    kind: EntityKind,
    sender: mpsc::UnboundedSender<Snapshot>,
}

/// In-memory [`LedgerStore`] implementation with snapshot emission.
#[derive(Default)]
pub struct MemoryLedgerStore {
    inner: Mutex<Inner>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next write fail with a [`StorageError::WriteFailed`], so
    /// storage-fault paths can be exercised deterministically.
    pub fn fail_next_write(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_next_write = true;
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StorageError::Backend("store mutex poisoned".to_string()))
    }

    fn scope_matches(document: &Value, account_id: &str) -> bool {
        document
            .get(ACCOUNT_SCOPE_FIELD)
            .and_then(Value::as_str)
            .is_some_and(|scope| scope == account_id)
    }

    fn scoped_documents(
        inner: &Inner,
        owner: &str,
        kind: EntityKind,
        account_id: &str,
    ) -> Vec<Value> {
        inner
            .collections
            .get(&(owner.to_string(), kind))
            .map(|documents| {
                documents
                    .values()
                    .filter(|document| Self::scope_matches(document, account_id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Re-emits the watched collections touched by a write to `(owner, kind)`.
    /// Watchers whose receiving side has gone away are pruned here.
    fn emit(inner: &mut Inner, owner: &str, kind: EntityKind) {
        let targets: Vec<(usize, String)> = inner
            .watchers
            .iter()
            .enumerate()
            .filter(|(_, watcher)| watcher.owner == owner && watcher.kind == kind)
            .map(|(index, watcher)| (index, watcher.account_id.clone()))
            .collect();

        let mut dead = Vec::new();
        for (index, account_id) in targets {
            let documents = Self::scoped_documents(inner, owner, kind, &account_id);
            trace!(
                %kind,
                %account_id,
                documents = documents.len(),
                "emitting snapshot"
            );
            let snapshot = Snapshot {
                kind,
                account_id,
                documents,
            };
            if inner.watchers[index].sender.send(snapshot).is_err() {
                dead.push(index);
            }
        }
        if !dead.is_empty() {
            debug!(count = dead.len(), "pruning unsubscribed watchers");
            for index in dead.into_iter().rev() {
                inner.watchers.remove(index);
            }
        }
    }

    fn take_write_failure(inner: &mut Inner, kind: EntityKind) -> Result<()> {
        if inner.fail_next_write {
            inner.fail_next_write = false;
            warn!(%kind, "injected write failure");
            return Err(StorageError::WriteFailed {
                kind,
                reason: "injected write failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn create_or_replace(
        &self,
        kind: EntityKind,
        owner: &str,
        id: &str,
        document: Value,
    ) -> Result<()> {
        let mut inner = self.lock()?;
        Self::take_write_failure(&mut inner, kind)?;
        inner
            .collections
            .entry((owner.to_string(), kind))
            .or_default()
            .insert(id.to_string(), document);
        debug!(%kind, owner, id, "document stored");
        Self::emit(&mut inner, owner, kind);
        Ok(())
    }

    async fn delete(&self, kind: EntityKind, owner: &str, id: &str) -> Result<()> {
        let mut inner = self.lock()?;
        Self::take_write_failure(&mut inner, kind)?;
        let removed = inner
            .collections
            .get_mut(&(owner.to_string(), kind))
            .and_then(|documents| documents.remove(id));
        if removed.is_some() {
            debug!(%kind, owner, id, "document deleted");
            Self::emit(&mut inner, owner, kind);
        } else {
            trace!(%kind, owner, id, "delete of missing document ignored");
        }
        Ok(())
    }

    async fn list_for_owner(
        &self,
        kind: EntityKind,
        owner: &str,
        account_scope: Option<&str>,
    ) -> Result<Vec<Value>> {
        let inner = self.lock()?;
        let documents = match account_scope {
            Some(account_id) => Self::scoped_documents(&inner, owner, kind, account_id),
            None => inner
                .collections
                .get(&(owner.to_string(), kind))
                .map(|documents| documents.values().cloned().collect())
                .unwrap_or_default(),
        };
        Ok(documents)
    }

    async fn subscribe(
        &self,
        owner: &str,
        account_id: &str,
        kind: EntityKind,
    ) -> Result<CollectionSubscription> {
        let mut inner = self.lock()?;
        let (sender, receiver) = mpsc::unbounded_channel();

        // The first snapshot carries the current contents, so a fresh
        // subscriber starts from known state rather than waiting for a write.
        let initial = Snapshot {
            kind,
            account_id: account_id.to_string(),
            documents: Self::scoped_documents(&inner, owner, kind, account_id),
        };
        sender.send(initial).map_err(|_| StorageError::SubscriptionFailed {
            kind,
            account_id: account_id.to_string(),
            reason: "receiver closed during setup".to_string(),
        })?;

        inner.watchers.push(Watcher {
            owner: owner.to_string(),
            account_id: account_id.to_string(),
            kind,
            sender,
        });
        debug!(%kind, owner, account_id, "collection subscribed");

        Ok(CollectionSubscription::new(
            kind,
            account_id.to_string(),
            receiver,
        ))
    }
}
