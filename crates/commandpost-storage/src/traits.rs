//! Storage traits every backend must implement.

use async_trait::async_trait;

use commandpost_core::{
    Ambulance, CollectionPoint, Event, EventAmbulance, EventHospital, Hospital, Patient, User,
};

use crate::error::StorageError;
use crate::record::Record;
use crate::types::Visibility;

/// Per-entity repository with soft-delete semantics.
///
/// Lookups take a [`Visibility`]; bulk operations take the record's filter
/// type and return affected-row counts. Missing rows are not errors here;
/// the service layer decides what a zero count or a `None` means.
///
/// # Example
///
/// ```ignore
/// async fn vehicle(repo: &dyn Repository<Ambulance>, id: AmbulanceId) -> Option<String> {
///     repo.find_by_id(id, Visibility::Live)
///         .await
///         .ok()
///         .flatten()
///         .map(|a| a.vehicle_number)
/// }
/// ```
#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Looks up a row by id under the given visibility.
    async fn find_by_id(&self, id: R::Id, vis: Visibility) -> Result<Option<R>, StorageError>;

    /// Returns every row admitted by the visibility, ordered by id.
    async fn find_all(&self, vis: Visibility) -> Result<Vec<R>, StorageError>;

    /// Returns every matching row admitted by the visibility, ordered by id.
    async fn find_where(
        &self,
        filter: &R::Filter,
        vis: Visibility,
    ) -> Result<Vec<R>, StorageError>;

    /// Creates a row from the given payload and returns it.
    async fn insert(&self, new: R::New) -> Result<R, StorageError>;

    /// Applies a patch to the live row with the given id.
    ///
    /// Returns the number of rows affected: 0 when the row is missing or
    /// tombstoned, 1 otherwise.
    async fn update(&self, id: R::Id, patch: R::Patch) -> Result<u64, StorageError>;

    /// Tombstones every live matching row. Returns the affected count.
    async fn soft_delete(&self, filter: &R::Filter) -> Result<u64, StorageError>;

    /// Clears the tombstone of every matching tombstoned row. Returns the
    /// affected count; live rows are left alone.
    async fn restore(&self, filter: &R::Filter) -> Result<u64, StorageError>;

    /// Permanently removes every matching row, tombstoned or not. Returns
    /// the affected count.
    async fn hard_delete(&self, filter: &R::Filter) -> Result<u64, StorageError>;

    /// Counts matching rows under the given visibility.
    async fn count(&self, filter: &R::Filter, vis: Visibility) -> Result<u64, StorageError>;
}

/// A transaction handle for one multi-step mutation.
///
/// Writes issued between [`CommandStore::begin`] and [`AtomicScope::commit`]
/// become durable together; dropping the scope without committing rolls
/// every one of them back.
#[async_trait]
pub trait AtomicScope: Send + Sync {
    /// Makes the scope's writes durable. Consumes the scope.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Transaction` if the commit fails; the writes
    /// are rolled back in that case.
    async fn commit(self: Box<Self>) -> Result<(), StorageError>;
}

/// The full storage bundle the service layer works against.
#[async_trait]
pub trait CommandStore: Send + Sync {
    fn users(&self) -> &dyn Repository<User>;
    fn events(&self) -> &dyn Repository<Event>;
    fn ambulances(&self) -> &dyn Repository<Ambulance>;
    fn hospitals(&self) -> &dyn Repository<Hospital>;
    fn collection_points(&self) -> &dyn Repository<CollectionPoint>;
    fn patients(&self) -> &dyn Repository<Patient>;
    fn event_ambulances(&self) -> &dyn Repository<EventAmbulance>;
    fn event_hospitals(&self) -> &dyn Repository<EventHospital>;

    /// Opens an atomic scope for a multi-step mutation.
    async fn begin(&self) -> Result<Box<dyn AtomicScope>, StorageError>;

    /// Name of this backend for logging.
    fn backend_name(&self) -> &'static str;
}
