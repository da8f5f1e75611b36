//! Hospital orchestrators. Same lifecycle as ambulances, substituting the
//! hospital junction table and the hospital foreign key on patients.

use tracing::debug;

use commandpost_core::{EntityKind, Event, Hospital, HospitalId, HospitalPatch, NewHospital, Role};
use commandpost_storage::{IdFilter, LinkFilter, PatientFilter, Visibility};

use crate::error::ServiceError;
use crate::links::Links;
use crate::validate::require_nonempty;
use crate::{CommandService, acl};

impl CommandService {
    pub async fn list_hospitals(&self) -> Result<Vec<Hospital>, ServiceError> {
        Ok(self.store().hospitals().find_all(Visibility::Live).await?)
    }

    pub async fn get_hospital(&self, id: HospitalId) -> Result<Option<Hospital>, ServiceError> {
        Ok(self
            .store()
            .hospitals()
            .find_by_id(id, Visibility::Live)
            .await?)
    }

    pub async fn add_hospital(
        &self,
        caller: Option<Role>,
        new: NewHospital,
    ) -> Result<Hospital, ServiceError> {
        self.gate().check(caller, acl::HOSPITAL_MANAGE)?;
        require_nonempty("name", &new.name)?;

        let scope = self.store().begin().await?;
        let hospital = self.store().hospitals().insert(new).await?;
        scope.commit().await?;
        Ok(hospital)
    }

    pub async fn update_hospital(
        &self,
        caller: Option<Role>,
        id: HospitalId,
        patch: HospitalPatch,
    ) -> Result<Hospital, ServiceError> {
        self.gate().check(caller, acl::HOSPITAL_MANAGE)?;
        if let Some(name) = patch.name.as_set() {
            require_nonempty("name", name)?;
        }

        let scope = self.store().begin().await?;
        let affected = self.store().hospitals().update(id, patch).await?;
        if affected == 0 {
            return Err(ServiceError::deletion_failed(EntityKind::Hospital, id));
        }
        scope.commit().await?;

        self.require_hospital(id).await
    }

    /// Tombstones the hospital and its junction rows. Blocked while any
    /// patient row references the hospital, tombstoned patients included.
    pub async fn delete_hospital(
        &self,
        caller: Option<Role>,
        id: HospitalId,
    ) -> Result<u64, ServiceError> {
        self.gate().check(caller, acl::HOSPITAL_DELETE)?;

        let dependents = self
            .store()
            .patients()
            .count(&PatientFilter::by_hospital(id), Visibility::IncludeDeleted)
            .await?;
        if dependents > 0 {
            return Err(ServiceError::conflict(
                EntityKind::Hospital,
                id,
                format!("{dependents} associated patient(s)"),
            ));
        }

        let scope = self.store().begin().await?;
        self.store()
            .event_hospitals()
            .soft_delete(&LinkFilter::by_other(id))
            .await?;
        let affected = self
            .store()
            .hospitals()
            .soft_delete(&IdFilter::by_id(id))
            .await?;
        scope.commit().await?;

        debug!(hospital_id = %id, affected, "hospital deleted");
        Ok(affected)
    }

    /// Un-tombstones the hospital, then its junction rows to still-live
    /// events.
    pub async fn restore_hospital(
        &self,
        caller: Option<Role>,
        id: HospitalId,
    ) -> Result<Hospital, ServiceError> {
        self.gate().check(caller, acl::HOSPITAL_DELETE)?;

        let scope = self.store().begin().await?;
        self.store()
            .hospitals()
            .restore(&IdFilter::by_id(id))
            .await?;
        let restored_links = Links::new(self.store().event_hospitals(), self.store().events())
            .restore_for_live_events(id)
            .await?;
        scope.commit().await?;

        debug!(hospital_id = %id, restored_links, "hospital restored");
        self.require_hospital(id).await
    }

    /// Live events the hospital is linked to.
    pub async fn events_for_hospital(&self, id: HospitalId) -> Result<Vec<Event>, ServiceError> {
        let links = self
            .store()
            .event_hospitals()
            .find_where(&LinkFilter::by_other(id), Visibility::Live)
            .await?;
        let mut rows = Vec::with_capacity(links.len());
        for link in links {
            if let Some(event) = self
                .store()
                .events()
                .find_by_id(link.event_id, Visibility::Live)
                .await?
            {
                rows.push(event);
            }
        }
        rows.sort_by_key(|e| e.id);
        Ok(rows)
    }

    async fn require_hospital(&self, id: HospitalId) -> Result<Hospital, ServiceError> {
        self.store()
            .hospitals()
            .find_by_id(id, Visibility::Live)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Hospital, id))
    }
}
