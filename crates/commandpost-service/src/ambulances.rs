//! Ambulance orchestrators.

use tracing::debug;

use commandpost_core::{
    Ambulance, AmbulanceId, AmbulancePatch, EntityKind, Event, NewAmbulance, Role,
};
use commandpost_storage::{IdFilter, LinkFilter, PatientFilter, Visibility};

use crate::error::ServiceError;
use crate::links::Links;
use crate::validate::require_nonempty;
use crate::{CommandService, acl};

impl CommandService {
    pub async fn list_ambulances(&self, caller: Option<Role>) -> Result<Vec<Ambulance>, ServiceError> {
        self.gate().check(caller, acl::AMBULANCE_READ)?;
        Ok(self.store().ambulances().find_all(Visibility::Live).await?)
    }

    pub async fn get_ambulance(
        &self,
        caller: Option<Role>,
        id: AmbulanceId,
    ) -> Result<Option<Ambulance>, ServiceError> {
        self.gate().check(caller, acl::AMBULANCE_READ)?;
        Ok(self
            .store()
            .ambulances()
            .find_by_id(id, Visibility::Live)
            .await?)
    }

    pub async fn add_ambulance(
        &self,
        caller: Option<Role>,
        new: NewAmbulance,
    ) -> Result<Ambulance, ServiceError> {
        self.gate().check(caller, acl::AMBULANCE_MANAGE)?;
        require_nonempty("vehicle number", &new.vehicle_number)?;

        let scope = self.store().begin().await?;
        let ambulance = self.store().ambulances().insert(new).await?;
        scope.commit().await?;
        Ok(ambulance)
    }

    pub async fn update_ambulance(
        &self,
        caller: Option<Role>,
        id: AmbulanceId,
        patch: AmbulancePatch,
    ) -> Result<Ambulance, ServiceError> {
        self.gate().check(caller, acl::AMBULANCE_MANAGE)?;
        if let Some(number) = patch.vehicle_number.as_set() {
            require_nonempty("vehicle number", number)?;
        }

        let scope = self.store().begin().await?;
        let affected = self.store().ambulances().update(id, patch).await?;
        if affected == 0 {
            return Err(ServiceError::deletion_failed(EntityKind::Ambulance, id));
        }
        scope.commit().await?;

        self.require_ambulance(id).await
    }

    /// Tombstones the ambulance and its junction rows. Blocked while any
    /// patient row references the ambulance, tombstoned patients included.
    pub async fn delete_ambulance(
        &self,
        caller: Option<Role>,
        id: AmbulanceId,
    ) -> Result<u64, ServiceError> {
        self.gate().check(caller, acl::AMBULANCE_DELETE)?;

        let dependents = self
            .store()
            .patients()
            .count(&PatientFilter::by_ambulance(id), Visibility::IncludeDeleted)
            .await?;
        if dependents > 0 {
            return Err(ServiceError::conflict(
                EntityKind::Ambulance,
                id,
                format!("{dependents} associated patient(s)"),
            ));
        }

        let scope = self.store().begin().await?;
        self.store()
            .event_ambulances()
            .soft_delete(&LinkFilter::by_other(id))
            .await?;
        let affected = self
            .store()
            .ambulances()
            .soft_delete(&IdFilter::by_id(id))
            .await?;
        scope.commit().await?;

        debug!(ambulance_id = %id, affected, "ambulance deleted");
        Ok(affected)
    }

    /// Un-tombstones the ambulance, then its junction rows to still-live
    /// events. Links to tombstoned events stay down.
    pub async fn restore_ambulance(
        &self,
        caller: Option<Role>,
        id: AmbulanceId,
    ) -> Result<Ambulance, ServiceError> {
        self.gate().check(caller, acl::AMBULANCE_DELETE)?;

        let scope = self.store().begin().await?;
        self.store()
            .ambulances()
            .restore(&IdFilter::by_id(id))
            .await?;
        let restored_links = Links::new(self.store().event_ambulances(), self.store().events())
            .restore_for_live_events(id)
            .await?;
        scope.commit().await?;

        debug!(ambulance_id = %id, restored_links, "ambulance restored");
        self.require_ambulance(id).await
    }

    /// Live events the ambulance is linked to.
    pub async fn events_for_ambulance(
        &self,
        id: AmbulanceId,
    ) -> Result<Vec<Event>, ServiceError> {
        let links = self
            .store()
            .event_ambulances()
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

    async fn require_ambulance(&self, id: AmbulanceId) -> Result<Ambulance, ServiceError> {
        self.store()
            .ambulances()
            .find_by_id(id, Visibility::Live)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Ambulance, id))
    }
}
