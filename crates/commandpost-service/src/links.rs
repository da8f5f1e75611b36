//! Association lifecycle for the event junction tables.
//!
//! Both junction kinds (event-ambulance, event-hospital) share the same
//! lifecycle: links are tombstoned rather than erased, re-linking restores
//! the tombstoned row, and duplicate rows for one pair (an anomaly left
//! behind by past unchecked inserts) are collapsed back to exactly one.

use tracing::{debug, warn};

use commandpost_core::{Event, EventId};
use commandpost_storage::{Junction, LinkFilter, Record, Repository, Visibility};

use crate::error::ServiceError;

/// Association operations over one junction kind.
pub struct Links<'a, J: Junction> {
    junctions: &'a dyn Repository<J>,
    events: &'a dyn Repository<Event>,
}

impl<'a, J: Junction> Links<'a, J> {
    pub fn new(junctions: &'a dyn Repository<J>, events: &'a dyn Repository<Event>) -> Self {
        Self { junctions, events }
    }

    /// Ensures exactly one live junction row for the pair.
    ///
    /// Zero existing rows: create one. One existing row: restore it,
    /// whatever its current state, so re-linking is idempotent. More than
    /// one: collapse, permanently erasing all rows for the pair and
    /// creating a single fresh live one.
    ///
    /// Callers validate that both sides of the pair exist before invoking
    /// this; the collapse branch does not re-validate.
    pub async fn upsert(&self, event_id: EventId, other_id: J::OtherId) -> Result<(), ServiceError> {
        let pair = LinkFilter::pair(event_id, other_id);
        let rows = self
            .junctions
            .find_where(&pair, Visibility::IncludeDeleted)
            .await?;

        match rows.len() {
            0 => {
                self.junctions.insert(J::link(event_id, other_id)).await?;
            }
            1 => {
                self.junctions.restore(&pair).await?;
            }
            n => {
                warn!(
                    kind = %J::KIND,
                    event_id = %event_id,
                    other_id = %other_id,
                    rows = n,
                    "collapsing duplicate junction rows"
                );
                self.junctions.hard_delete(&pair).await?;
                self.junctions.insert(J::link(event_id, other_id)).await?;
            }
        }
        Ok(())
    }

    /// Tombstones the pair's junction row(s). Duplicates are left as they
    /// are; this is a plain soft delete.
    pub async fn unlink(
        &self,
        event_id: EventId,
        other_id: J::OtherId,
    ) -> Result<u64, ServiceError> {
        Ok(self
            .junctions
            .soft_delete(&LinkFilter::pair(event_id, other_id))
            .await?)
    }

    /// Replaces the event's entire link set: tombstone every existing row,
    /// then upsert each id. Full tombstone-and-recreate, not a diff; a
    /// formerly linked id that reappears in `other_ids` gets its row
    /// restored by the upsert.
    ///
    /// The caller validates all of `other_ids` before this runs, so the
    /// operation never stops halfway through with links already destroyed.
    pub async fn replace_all(
        &self,
        event_id: EventId,
        other_ids: &[J::OtherId],
    ) -> Result<(), ServiceError> {
        let cleared = self
            .junctions
            .soft_delete(&LinkFilter::by_event(event_id))
            .await?;
        debug!(kind = %J::KIND, event_id = %event_id, cleared, incoming = other_ids.len(), "replacing link set");
        for &other_id in other_ids {
            self.upsert(event_id, other_id).await?;
        }
        Ok(())
    }

    /// Restores tombstoned junction rows of the given ambulance/hospital,
    /// but only those whose event is still live. Links to tombstoned
    /// events stay tombstoned.
    pub async fn restore_for_live_events(
        &self,
        other_id: J::OtherId,
    ) -> Result<u64, ServiceError> {
        let rows = self
            .junctions
            .find_where(&LinkFilter::by_other(other_id), Visibility::IncludeDeleted)
            .await?;

        let mut restored = 0;
        for row in rows {
            if !row.meta().is_deleted() {
                continue;
            }
            let event_live = self
                .events
                .find_by_id(row.event_id(), Visibility::Live)
                .await?
                .is_some();
            if event_live {
                restored += self
                    .junctions
                    .restore(&LinkFilter::pair(row.event_id(), other_id))
                    .await?;
            }
        }
        Ok(restored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commandpost_core::{AmbulanceId, EventAmbulance, NewAmbulance, NewEvent, NewUser, Role};
    use commandpost_db_memory::MemoryStore;
    use commandpost_storage::{CommandStore, IdFilter};
    use time::OffsetDateTime;

    async fn seed_event(store: &MemoryStore) -> EventId {
        let user = store
            .users()
            .insert(NewUser {
                first_name: "Priya".into(),
                last_name: "Nair".into(),
                email: "priya@example.org".into(),
                password: "secret".into(),
                access_level: Role::Commander,
                emergency_contact: None,
            })
            .await
            .unwrap();
        store
            .events()
            .insert(NewEvent {
                name: "Parade".into(),
                event_date: OffsetDateTime::now_utc(),
                created_by: user.id,
                is_active: true,
            })
            .await
            .unwrap()
            .id
    }

    async fn seed_ambulance(store: &MemoryStore, number: &str) -> AmbulanceId {
        store
            .ambulances()
            .insert(NewAmbulance {
                vehicle_number: number.into(),
            })
            .await
            .unwrap()
            .id
    }

    async fn live_pairs(store: &MemoryStore, event_id: EventId, other_id: AmbulanceId) -> usize {
        store
            .event_ambulances()
            .find_where(&LinkFilter::pair(event_id, other_id), Visibility::Live)
            .await
            .unwrap()
            .len()
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let store = MemoryStore::new();
        let event_id = seed_event(&store).await;
        let amb_id = seed_ambulance(&store, "A-1").await;
        let links: Links<'_, EventAmbulance> =
            Links::new(store.event_ambulances(), store.events());

        links.upsert(event_id, amb_id).await.unwrap();
        links.upsert(event_id, amb_id).await.unwrap();

        assert_eq!(live_pairs(&store, event_id, amb_id).await, 1);
    }

    #[tokio::test]
    async fn test_upsert_restores_a_tombstoned_link() {
        let store = MemoryStore::new();
        let event_id = seed_event(&store).await;
        let amb_id = seed_ambulance(&store, "A-1").await;
        let links: Links<'_, EventAmbulance> =
            Links::new(store.event_ambulances(), store.events());

        links.upsert(event_id, amb_id).await.unwrap();
        links.unlink(event_id, amb_id).await.unwrap();
        assert_eq!(live_pairs(&store, event_id, amb_id).await, 0);

        links.upsert(event_id, amb_id).await.unwrap();
        assert_eq!(live_pairs(&store, event_id, amb_id).await, 1);

        // The restored row is the original one, not a new insert.
        let all = store
            .event_ambulances()
            .find_where(
                &LinkFilter::pair(event_id, amb_id),
                Visibility::IncludeDeleted,
            )
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_collapses_duplicate_rows() {
        let store = MemoryStore::new();
        let event_id = seed_event(&store).await;
        let amb_id = seed_ambulance(&store, "A-1").await;

        // Seed the anomaly directly: two rows for the same pair.
        store
            .event_ambulances()
            .insert(EventAmbulance::link(event_id, amb_id))
            .await
            .unwrap();
        store
            .event_ambulances()
            .insert(EventAmbulance::link(event_id, amb_id))
            .await
            .unwrap();

        let links: Links<'_, EventAmbulance> =
            Links::new(store.event_ambulances(), store.events());
        links.upsert(event_id, amb_id).await.unwrap();

        let all = store
            .event_ambulances()
            .find_where(
                &LinkFilter::pair(event_id, amb_id),
                Visibility::IncludeDeleted,
            )
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
        assert!(!all[0].meta.is_deleted());
    }

    #[tokio::test]
    async fn test_replace_all_tombstones_old_links() {
        let store = MemoryStore::new();
        let event_id = seed_event(&store).await;
        let a1 = seed_ambulance(&store, "A-1").await;
        let a2 = seed_ambulance(&store, "A-2").await;
        let links: Links<'_, EventAmbulance> =
            Links::new(store.event_ambulances(), store.events());

        links.upsert(event_id, a1).await.unwrap();
        links.replace_all(event_id, &[a2]).await.unwrap();

        assert_eq!(live_pairs(&store, event_id, a1).await, 0);
        assert_eq!(live_pairs(&store, event_id, a2).await, 1);

        // The old link is tombstoned, not erased.
        let old = store
            .event_ambulances()
            .find_where(&LinkFilter::pair(event_id, a1), Visibility::IncludeDeleted)
            .await
            .unwrap();
        assert_eq!(old.len(), 1);
        assert!(old[0].meta.is_deleted());
    }

    #[tokio::test]
    async fn test_restore_for_live_events_skips_tombstoned_events() {
        let store = MemoryStore::new();
        let live_event = seed_event(&store).await;
        let dead_event = seed_event(&store).await;
        let amb_id = seed_ambulance(&store, "A-1").await;
        let links: Links<'_, EventAmbulance> =
            Links::new(store.event_ambulances(), store.events());

        links.upsert(live_event, amb_id).await.unwrap();
        links.upsert(dead_event, amb_id).await.unwrap();

        // Tombstone both links and the second event.
        store
            .event_ambulances()
            .soft_delete(&LinkFilter::by_other(amb_id))
            .await
            .unwrap();
        store
            .events()
            .soft_delete(&IdFilter::by_id(dead_event))
            .await
            .unwrap();

        let restored = links.restore_for_live_events(amb_id).await.unwrap();
        assert_eq!(restored, 1);
        assert_eq!(live_pairs(&store, live_event, amb_id).await, 1);
        assert_eq!(live_pairs(&store, dead_event, amb_id).await, 0);
    }
}
