//! Per-kind collection cache
//!
//! Holds the last fetched list of records for one resource kind. The only
//! writes are full re-fetch-and-replace refreshes, so concurrent refreshes are
//! harmless; a ticket makes sure a slower, older refresh never overwrites the
//! result of a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use vitrine_core::models::{Resource, ResourceKind};

use crate::error::{CacheRefreshError, PersistenceError};
use crate::store::RecordStore;

#[derive(Debug, Default)]
struct Snapshot {
    resources: Vec<Resource>,
    refreshed_at: Option<DateTime<Utc>>,
    ticket: u64,
}

pub struct ResourceCollectionCache {
    kind: ResourceKind,
    store: Arc<dyn RecordStore>,
    snapshot: RwLock<Snapshot>,
    next_ticket: AtomicU64,
}

impl ResourceCollectionCache {
    pub fn new(kind: ResourceKind, store: Arc<dyn RecordStore>) -> Self {
        Self {
            kind,
            store,
            snapshot: RwLock::new(Snapshot::default()),
            next_ticket: AtomicU64::new(1),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Re-fetch the whole collection and replace the cached one.
    ///
    /// Returns the number of records fetched. On failure the previous
    /// contents stay in place.
    pub async fn refresh(&self) -> Result<usize, CacheRefreshError> {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst);

        let resources = self
            .store
            .list(self.kind)
            .await
            .map_err(|source| {
                tracing::warn!(kind = %self.kind, error = %source, "Collection refresh failed");
                CacheRefreshError {
                    kind: self.kind,
                    source,
                }
            })?;
        let count = resources.len();

        let mut snapshot = self.write();
        if snapshot.ticket > ticket {
            tracing::debug!(kind = %self.kind, ticket, "Discarding stale refresh result");
            return Ok(count);
        }
        snapshot.resources = resources;
        snapshot.refreshed_at = Some(Utc::now());
        snapshot.ticket = ticket;

        tracing::debug!(kind = %self.kind, count, "Collection refreshed");
        Ok(count)
    }

    pub fn resources(&self) -> Vec<Resource> {
        self.read().resources.clone()
    }

    pub fn get(&self, id: &str) -> Option<Resource> {
        self.read()
            .resources
            .iter()
            .find(|resource| resource.id() == Some(id))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.read().resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().resources.is_empty()
    }

    /// `None` until the first successful refresh.
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.read().refreshed_at
    }

    /// Delete record `id` from the store, then refresh.
    ///
    /// A failed refresh is returned in the `Ok` value; the deletion stands.
    pub async fn delete(&self, id: &str) -> Result<Option<CacheRefreshError>, PersistenceError> {
        self.store.delete(self.kind, id).await?;
        tracing::info!(kind = %self.kind, id, "Record deleted");
        Ok(self.refresh().await.err())
    }

    fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.snapshot.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.snapshot.write().unwrap_or_else(|e| e.into_inner())
    }
}
