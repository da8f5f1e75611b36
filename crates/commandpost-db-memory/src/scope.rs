use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use commandpost_storage::{AtomicScope, StorageError};

use crate::store::{StoreInner, Tables};

/// Snapshot-based atomic scope.
///
/// Holds the store-wide scope gate for its lifetime, so scopes never
/// interleave. Commit discards the snapshot; dropping an uncommitted scope
/// writes the snapshot back, undoing every write made since `begin`.
pub(crate) struct MemoryScope {
    inner: Arc<StoreInner>,
    snapshot: Option<Tables>,
    _permit: OwnedMutexGuard<()>,
}

impl MemoryScope {
    pub(crate) fn new(
        inner: Arc<StoreInner>,
        snapshot: Tables,
        permit: OwnedMutexGuard<()>,
    ) -> Self {
        Self {
            inner,
            snapshot: Some(snapshot),
            _permit: permit,
        }
    }
}

#[async_trait]
impl AtomicScope for MemoryScope {
    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        let mut this = self;
        this.snapshot = None;
        Ok(())
    }
}

impl Drop for MemoryScope {
    fn drop(&mut self) {
        let Some(snapshot) = self.snapshot.take() else {
            return;
        };
        match self.inner.write() {
            Ok(mut tables) => *tables = snapshot,
            Err(err) => {
                // Nothing left to do here; the store is already broken.
                tracing::error!(error = %err, "rollback failed, store state is inconsistent");
            }
        }
    }
}
