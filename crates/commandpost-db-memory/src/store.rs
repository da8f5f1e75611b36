use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use commandpost_core::{
    Ambulance, AmbulanceId, CollectionPoint, CollectionPointId, Event, EventAmbulance,
    EventHospital, EventId, Hospital, HospitalId, LinkId, Patient, PatientId, User, UserId,
};
use commandpost_storage::{AtomicScope, CommandStore, Record, Repository, StorageError, Visibility};

use crate::scope::MemoryScope;

/// All tables of the in-memory backend.
///
/// Cloneable so an atomic scope can snapshot the whole store for rollback.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    users: HashMap<UserId, User>,
    events: HashMap<EventId, Event>,
    ambulances: HashMap<AmbulanceId, Ambulance>,
    hospitals: HashMap<HospitalId, Hospital>,
    collection_points: HashMap<CollectionPointId, CollectionPoint>,
    patients: HashMap<PatientId, Patient>,
    event_ambulances: HashMap<LinkId, EventAmbulance>,
    event_hospitals: HashMap<LinkId, EventHospital>,
}

/// Maps a record type to its table.
pub(crate) trait TableSlot: Record {
    fn slot(tables: &Tables) -> &HashMap<Self::Id, Self>;
    fn slot_mut(tables: &mut Tables) -> &mut HashMap<Self::Id, Self>;
}

macro_rules! table_slot {
    ($record:ty, $field:ident) => {
        impl TableSlot for $record {
            fn slot(tables: &Tables) -> &HashMap<Self::Id, Self> {
                &tables.$field
            }

            fn slot_mut(tables: &mut Tables) -> &mut HashMap<Self::Id, Self> {
                &mut tables.$field
            }
        }
    };
}

table_slot!(User, users);
table_slot!(Event, events);
table_slot!(Ambulance, ambulances);
table_slot!(Hospital, hospitals);
table_slot!(CollectionPoint, collection_points);
table_slot!(Patient, patients);
table_slot!(EventAmbulance, event_ambulances);
table_slot!(EventHospital, event_hospitals);

pub(crate) struct StoreInner {
    tables: RwLock<Tables>,
    /// One id sequence across all tables, like a global serial.
    seq: AtomicI64,
    /// Serializes atomic scopes; held for the lifetime of each scope.
    scope_gate: Arc<Mutex<()>>,
}

impl StoreInner {
    fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            seq: AtomicI64::new(1),
            scope_gate: Arc::new(Mutex::new(())),
        }
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StorageError> {
        self.tables
            .read()
            .map_err(|_| StorageError::internal("table lock poisoned"))
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StorageError> {
        self.tables
            .write()
            .map_err(|_| StorageError::internal("table lock poisoned"))
    }

    fn next_id(&self) -> i64 {
        self.seq.fetch_add(1, Ordering::SeqCst)
    }
}

/// Generic repository over one table.
pub(crate) struct MemoryRepository<R> {
    inner: Arc<StoreInner>,
    _marker: PhantomData<fn() -> R>,
}

impl<R> MemoryRepository<R> {
    fn new(inner: Arc<StoreInner>) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<R: TableSlot> Repository<R> for MemoryRepository<R> {
    async fn find_by_id(&self, id: R::Id, vis: Visibility) -> Result<Option<R>, StorageError> {
        let tables = self.inner.read()?;
        Ok(R::slot(&tables)
            .get(&id)
            .filter(|row| vis.admits(row.meta().is_deleted()))
            .cloned())
    }

    async fn find_all(&self, vis: Visibility) -> Result<Vec<R>, StorageError> {
        let tables = self.inner.read()?;
        let mut rows: Vec<R> = R::slot(&tables)
            .values()
            .filter(|row| vis.admits(row.meta().is_deleted()))
            .cloned()
            .collect();
        rows.sort_by_key(Record::id);
        Ok(rows)
    }

    async fn find_where(
        &self,
        filter: &R::Filter,
        vis: Visibility,
    ) -> Result<Vec<R>, StorageError> {
        let tables = self.inner.read()?;
        let mut rows: Vec<R> = R::slot(&tables)
            .values()
            .filter(|row| vis.admits(row.meta().is_deleted()) && row.matches(filter))
            .cloned()
            .collect();
        rows.sort_by_key(Record::id);
        Ok(rows)
    }

    async fn insert(&self, new: R::New) -> Result<R, StorageError> {
        let id = R::Id::from(self.inner.next_id());
        let row = R::build(id, new, OffsetDateTime::now_utc());
        let mut tables = self.inner.write()?;
        let slot = R::slot_mut(&mut tables);
        if slot.contains_key(&id) {
            return Err(StorageError::conflict(R::KIND, id));
        }
        slot.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: R::Id, patch: R::Patch) -> Result<u64, StorageError> {
        let mut tables = self.inner.write()?;
        match R::slot_mut(&mut tables).get_mut(&id) {
            Some(row) if !row.meta().is_deleted() => {
                row.apply(patch);
                row.meta_mut().touch(OffsetDateTime::now_utc());
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn soft_delete(&self, filter: &R::Filter) -> Result<u64, StorageError> {
        let now = OffsetDateTime::now_utc();
        let mut tables = self.inner.write()?;
        let mut affected = 0;
        for row in R::slot_mut(&mut tables).values_mut() {
            if !row.meta().is_deleted() && row.matches(filter) {
                row.meta_mut().tombstone(now);
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn restore(&self, filter: &R::Filter) -> Result<u64, StorageError> {
        let now = OffsetDateTime::now_utc();
        let mut tables = self.inner.write()?;
        let mut affected = 0;
        for row in R::slot_mut(&mut tables).values_mut() {
            if row.meta().is_deleted() && row.matches(filter) {
                row.meta_mut().revive(now);
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn hard_delete(&self, filter: &R::Filter) -> Result<u64, StorageError> {
        let mut tables = self.inner.write()?;
        let slot = R::slot_mut(&mut tables);
        let before = slot.len();
        slot.retain(|_, row| !row.matches(filter));
        Ok((before - slot.len()) as u64)
    }

    async fn count(&self, filter: &R::Filter, vis: Visibility) -> Result<u64, StorageError> {
        let tables = self.inner.read()?;
        Ok(R::slot(&tables)
            .values()
            .filter(|row| vis.admits(row.meta().is_deleted()) && row.matches(filter))
            .count() as u64)
    }
}

/// In-memory command store.
///
/// Suitable for development and tests; state lives for the lifetime of the
/// process. Atomic scopes are serialized by a store-wide mutex, so
/// concurrent multi-step mutations never interleave on this backend. The
/// lost-update race between concurrent link updates remains a property of
/// backends without that serialization.
pub struct MemoryStore {
    inner: Arc<StoreInner>,
    users: MemoryRepository<User>,
    events: MemoryRepository<Event>,
    ambulances: MemoryRepository<Ambulance>,
    hospitals: MemoryRepository<Hospital>,
    collection_points: MemoryRepository<CollectionPoint>,
    patients: MemoryRepository<Patient>,
    event_ambulances: MemoryRepository<EventAmbulance>,
    event_hospitals: MemoryRepository<EventHospital>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let inner = Arc::new(StoreInner::new());
        Self {
            users: MemoryRepository::new(Arc::clone(&inner)),
            events: MemoryRepository::new(Arc::clone(&inner)),
            ambulances: MemoryRepository::new(Arc::clone(&inner)),
            hospitals: MemoryRepository::new(Arc::clone(&inner)),
            collection_points: MemoryRepository::new(Arc::clone(&inner)),
            patients: MemoryRepository::new(Arc::clone(&inner)),
            event_ambulances: MemoryRepository::new(Arc::clone(&inner)),
            event_hospitals: MemoryRepository::new(Arc::clone(&inner)),
            inner,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandStore for MemoryStore {
    fn users(&self) -> &dyn Repository<User> {
        &self.users
    }

    fn events(&self) -> &dyn Repository<Event> {
        &self.events
    }

    fn ambulances(&self) -> &dyn Repository<Ambulance> {
        &self.ambulances
    }

    fn hospitals(&self) -> &dyn Repository<Hospital> {
        &self.hospitals
    }

    fn collection_points(&self) -> &dyn Repository<CollectionPoint> {
        &self.collection_points
    }

    fn patients(&self) -> &dyn Repository<Patient> {
        &self.patients
    }

    fn event_ambulances(&self) -> &dyn Repository<EventAmbulance> {
        &self.event_ambulances
    }

    fn event_hospitals(&self) -> &dyn Repository<EventHospital> {
        &self.event_hospitals
    }

    async fn begin(&self) -> Result<Box<dyn AtomicScope>, StorageError> {
        let permit = Arc::clone(&self.inner.scope_gate).lock_owned().await;
        let snapshot = self.inner.read()?.clone();
        Ok(Box::new(MemoryScope::new(
            Arc::clone(&self.inner),
            snapshot,
            permit,
        )))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commandpost_core::{Change, EventPatch, NewAmbulance, NewEvent, NewUser, Role};
    use commandpost_storage::IdFilter;

    fn store() -> MemoryStore {
        MemoryStore::new()
    }

    async fn seed_user(store: &MemoryStore) -> User {
        store
            .users()
            .insert(NewUser {
                first_name: "Dana".into(),
                last_name: "Reyes".into(),
                email: "dana@example.org".into(),
                password: "secret".into(),
                access_level: Role::Commander,
                emergency_contact: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = store();
        let a = store
            .ambulances()
            .insert(NewAmbulance {
                vehicle_number: "A-1".into(),
            })
            .await
            .unwrap();
        let b = store
            .ambulances()
            .insert(NewAmbulance {
                vehicle_number: "A-2".into(),
            })
            .await
            .unwrap();
        assert!(b.id.value() > a.id.value());

        let all = store.ambulances().find_all(Visibility::Live).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, a.id);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_and_restore_revives() {
        let store = store();
        let row = store
            .ambulances()
            .insert(NewAmbulance {
                vehicle_number: "A-1".into(),
            })
            .await
            .unwrap();

        let affected = store
            .ambulances()
            .soft_delete(&IdFilter::by_id(row.id))
            .await
            .unwrap();
        assert_eq!(affected, 1);

        assert!(
            store
                .ambulances()
                .find_by_id(row.id, Visibility::Live)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            store
                .ambulances()
                .find_by_id(row.id, Visibility::IncludeDeleted)
                .await
                .unwrap()
                .is_some()
        );

        // Tombstoning again is a no-op.
        let affected = store
            .ambulances()
            .soft_delete(&IdFilter::by_id(row.id))
            .await
            .unwrap();
        assert_eq!(affected, 0);

        let affected = store
            .ambulances()
            .restore(&IdFilter::by_id(row.id))
            .await
            .unwrap();
        assert_eq!(affected, 1);
        assert!(
            store
                .ambulances()
                .find_by_id(row.id, Visibility::Live)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_update_skips_tombstoned_rows() {
        let store = store();
        let user = seed_user(&store).await;
        let event = store
            .events()
            .insert(NewEvent {
                name: "Marathon".into(),
                event_date: OffsetDateTime::now_utc(),
                created_by: user.id,
                is_active: true,
            })
            .await
            .unwrap();

        store
            .events()
            .soft_delete(&IdFilter::by_id(event.id))
            .await
            .unwrap();

        let affected = store
            .events()
            .update(
                event.id,
                EventPatch {
                    name: Change::Set("Renamed".into()),
                    ..EventPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(affected, 0);
    }

    #[tokio::test]
    async fn test_hard_delete_removes_tombstoned_rows_too() {
        let store = store();
        let row = store
            .ambulances()
            .insert(NewAmbulance {
                vehicle_number: "A-1".into(),
            })
            .await
            .unwrap();
        store
            .ambulances()
            .soft_delete(&IdFilter::by_id(row.id))
            .await
            .unwrap();

        let affected = store
            .ambulances()
            .hard_delete(&IdFilter::by_id(row.id))
            .await
            .unwrap();
        assert_eq!(affected, 1);
        assert!(
            store
                .ambulances()
                .find_by_id(row.id, Visibility::IncludeDeleted)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_scope_commit_keeps_writes() {
        let store = store();
        let scope = store.begin().await.unwrap();
        let row = store
            .ambulances()
            .insert(NewAmbulance {
                vehicle_number: "A-1".into(),
            })
            .await
            .unwrap();
        scope.commit().await.unwrap();

        assert!(
            store
                .ambulances()
                .find_by_id(row.id, Visibility::Live)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_scope_drop_rolls_back() {
        let store = store();
        let kept = store
            .ambulances()
            .insert(NewAmbulance {
                vehicle_number: "A-1".into(),
            })
            .await
            .unwrap();

        {
            let _scope = store.begin().await.unwrap();
            store
                .ambulances()
                .insert(NewAmbulance {
                    vehicle_number: "A-2".into(),
                })
                .await
                .unwrap();
            store
                .ambulances()
                .soft_delete(&IdFilter::by_id(kept.id))
                .await
                .unwrap();
            // Dropped without commit.
        }

        let all = store.ambulances().find_all(Visibility::Live).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, kept.id);
    }
}
