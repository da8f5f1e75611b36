//! Collection point orchestrators.

use tracing::debug;

use commandpost_core::{
    CollectionPoint, CollectionPointId, CollectionPointPatch, EntityKind, NewCollectionPoint,
    Patient, Role,
};
use commandpost_storage::{IdFilter, PatientFilter, Visibility};

use crate::error::ServiceError;
use crate::validate::{ensure_exists, require_nonempty};
use crate::{CommandService, acl};

impl CommandService {
    pub async fn list_collection_points(&self) -> Result<Vec<CollectionPoint>, ServiceError> {
        Ok(self
            .store()
            .collection_points()
            .find_all(Visibility::Live)
            .await?)
    }

    pub async fn get_collection_point(
        &self,
        id: CollectionPointId,
    ) -> Result<Option<CollectionPoint>, ServiceError> {
        Ok(self
            .store()
            .collection_points()
            .find_by_id(id, Visibility::Live)
            .await?)
    }

    pub async fn add_collection_point(
        &self,
        caller: Option<Role>,
        new: NewCollectionPoint,
    ) -> Result<CollectionPoint, ServiceError> {
        self.gate().check(caller, acl::COLLECTION_POINT_MANAGE)?;
        require_nonempty("name", &new.name)?;
        ensure_exists(self.store().events(), new.event_id, Visibility::Live).await?;
        ensure_exists(self.store().users(), new.created_by, Visibility::Live).await?;

        let scope = self.store().begin().await?;
        let point = self.store().collection_points().insert(new).await?;
        scope.commit().await?;
        Ok(point)
    }

    pub async fn update_collection_point(
        &self,
        caller: Option<Role>,
        id: CollectionPointId,
        patch: CollectionPointPatch,
    ) -> Result<CollectionPoint, ServiceError> {
        self.gate().check(caller, acl::COLLECTION_POINT_MANAGE)?;
        if let Some(name) = patch.name.as_set() {
            require_nonempty("name", name)?;
        }

        let scope = self.store().begin().await?;
        let affected = self.store().collection_points().update(id, patch).await?;
        if affected == 0 {
            return Err(ServiceError::deletion_failed(EntityKind::CollectionPoint, id));
        }
        scope.commit().await?;

        self.require_collection_point(id).await
    }

    /// Tombstones the collection point and, as a system delete, every
    /// patient registered at it. The patients' `status` fields are left
    /// alone; this is the row-level deletion.
    pub async fn delete_collection_point(
        &self,
        caller: Option<Role>,
        id: CollectionPointId,
    ) -> Result<u64, ServiceError> {
        self.gate().check(caller, acl::COLLECTION_POINT_MANAGE)?;

        let scope = self.store().begin().await?;
        let patients = self
            .store()
            .patients()
            .soft_delete(&PatientFilter::by_collection_point(id))
            .await?;
        let affected = self
            .store()
            .collection_points()
            .soft_delete(&IdFilter::by_id(id))
            .await?;
        scope.commit().await?;

        debug!(collection_point_id = %id, affected, patients, "collection point deleted");
        Ok(affected)
    }

    /// Un-tombstones the collection point row only. Its system-deleted
    /// patients stay tombstoned and are restored individually.
    pub async fn restore_collection_point(
        &self,
        caller: Option<Role>,
        id: CollectionPointId,
    ) -> Result<CollectionPoint, ServiceError> {
        self.gate().check(caller, acl::COLLECTION_POINT_MANAGE)?;

        let scope = self.store().begin().await?;
        self.store()
            .collection_points()
            .restore(&IdFilter::by_id(id))
            .await?;
        scope.commit().await?;

        self.require_collection_point(id).await
    }

    /// Live patients registered at the collection point.
    pub async fn patients_for_collection_point(
        &self,
        id: CollectionPointId,
    ) -> Result<Vec<Patient>, ServiceError> {
        Ok(self
            .store()
            .patients()
            .find_where(&PatientFilter::by_collection_point(id), Visibility::Live)
            .await?)
    }

    async fn require_collection_point(
        &self,
        id: CollectionPointId,
    ) -> Result<CollectionPoint, ServiceError> {
        self.store()
            .collection_points()
            .find_by_id(id, Visibility::Live)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::CollectionPoint, id))
    }
}
