//! Row bookkeeping shared by every entity.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Creation, update and tombstone timestamps carried by every row.
///
/// A row with `deleted_at` set is tombstoned: it is invisible to live
/// queries but can be restored. Tombstoning is independent of any
/// entity-level status field (a patient can carry status `Deleted` on a
/// live row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowMeta {
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

impl RowMeta {
    /// Metadata for a freshly created row.
    #[must_use]
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Whether the row is tombstoned.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Records an in-place update.
    pub fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = now;
    }

    /// Tombstones the row. Idempotent: an existing tombstone is kept.
    pub fn tombstone(&mut self, now: OffsetDateTime) {
        if self.deleted_at.is_none() {
            self.deleted_at = Some(now);
        }
    }

    /// Clears the tombstone and records the restore as an update.
    pub fn revive(&mut self, now: OffsetDateTime) {
        self.deleted_at = None;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tombstone_and_revive() {
        let t0 = OffsetDateTime::from_unix_timestamp(1_000).unwrap();
        let t1 = OffsetDateTime::from_unix_timestamp(2_000).unwrap();
        let t2 = OffsetDateTime::from_unix_timestamp(3_000).unwrap();

        let mut meta = RowMeta::new(t0);
        assert!(!meta.is_deleted());

        meta.tombstone(t1);
        assert_eq!(meta.deleted_at, Some(t1));

        // A second tombstone keeps the original deletion time.
        meta.tombstone(t2);
        assert_eq!(meta.deleted_at, Some(t1));

        meta.revive(t2);
        assert!(!meta.is_deleted());
        assert_eq!(meta.updated_at, t2);
    }
}
