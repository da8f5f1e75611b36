//! Event orchestrators, including the batch link mutations.

use time::OffsetDateTime;
use tracing::debug;

use commandpost_core::{
    Ambulance, AmbulanceId, Change, EntityKind, Event, EventAmbulance, EventHospital, EventId,
    EventPatch, Hospital, HospitalId, NewEvent, Role, UserId,
};
use commandpost_storage::{IdFilter, Junction, LinkFilter, Record, Repository, Visibility};

use crate::error::ServiceError;
use crate::links::Links;
use crate::validate::{ensure_all_exist, ensure_exists, require_nonempty};
use crate::{CommandService, acl};

/// Arguments of the event update mutation.
///
/// The link lists are full-replacement sets: `Some(ids)` replaces the
/// event's entire relation, `None` leaves it untouched.
#[derive(Debug, Clone, Default)]
pub struct EventUpdate {
    pub name: Change<String>,
    pub event_date: Change<OffsetDateTime>,
    pub created_by: Change<UserId>,
    pub is_active: Change<bool>,
    pub ambulances: Option<Vec<AmbulanceId>>,
    pub hospitals: Option<Vec<HospitalId>>,
}

impl EventUpdate {
    fn patch(&self) -> EventPatch {
        EventPatch {
            name: self.name.clone(),
            event_date: self.event_date,
            created_by: self.created_by,
            is_active: self.is_active,
        }
    }
}

impl CommandService {
    pub async fn list_events(&self) -> Result<Vec<Event>, ServiceError> {
        Ok(self.store().events().find_all(Visibility::Live).await?)
    }

    pub async fn get_event(&self, id: EventId) -> Result<Option<Event>, ServiceError> {
        Ok(self.store().events().find_by_id(id, Visibility::Live).await?)
    }

    /// Creates an event. `created_by` must reference an existing user.
    pub async fn add_event(
        &self,
        caller: Option<Role>,
        new: NewEvent,
    ) -> Result<Event, ServiceError> {
        self.gate().check(caller, acl::EVENT_MANAGE)?;
        require_nonempty("name", &new.name)?;
        ensure_exists(self.store().users(), new.created_by, Visibility::Live).await?;

        let scope = self.store().begin().await?;
        let event = self.store().events().insert(new).await?;
        scope.commit().await?;

        debug!(event_id = %event.id, "event created");
        Ok(event)
    }

    /// Updates an event in place and, when a link list is supplied,
    /// replaces that whole relation. Every id in a supplied list is
    /// validated before any junction row is touched.
    pub async fn update_event(
        &self,
        caller: Option<Role>,
        id: EventId,
        update: EventUpdate,
    ) -> Result<Event, ServiceError> {
        self.gate().check(caller, acl::EVENT_MANAGE)?;
        if let Some(name) = update.name.as_set() {
            require_nonempty("name", name)?;
        }
        if let Change::Set(user_id) = update.created_by {
            ensure_exists(self.store().users(), user_id, Visibility::Live).await?;
        }
        if let Some(ids) = &update.ambulances {
            ensure_all_exist(self.store().ambulances(), ids, Visibility::Live).await?;
        }
        if let Some(ids) = &update.hospitals {
            ensure_all_exist(self.store().hospitals(), ids, Visibility::Live).await?;
        }

        let scope = self.store().begin().await?;
        let affected = self.store().events().update(id, update.patch()).await?;
        if affected == 0 {
            return Err(ServiceError::deletion_failed(EntityKind::Event, id));
        }
        if let Some(ids) = &update.ambulances {
            Links::new(self.store().event_ambulances(), self.store().events())
                .replace_all(id, ids)
                .await?;
        }
        if let Some(ids) = &update.hospitals {
            Links::new(self.store().event_hospitals(), self.store().events())
                .replace_all(id, ids)
                .await?;
        }
        scope.commit().await?;

        self.require_event(id).await
    }

    /// Tombstones the event's junction rows (both kinds), then the event
    /// row itself. Returns the number of event rows affected (0 or 1).
    pub async fn delete_event(
        &self,
        caller: Option<Role>,
        id: EventId,
    ) -> Result<u64, ServiceError> {
        self.gate().check(caller, acl::EVENT_MANAGE)?;

        let scope = self.store().begin().await?;
        self.store()
            .event_ambulances()
            .soft_delete(&LinkFilter::by_event(id))
            .await?;
        self.store()
            .event_hospitals()
            .soft_delete(&LinkFilter::by_event(id))
            .await?;
        let affected = self
            .store()
            .events()
            .soft_delete(&IdFilter::by_id(id))
            .await?;
        scope.commit().await?;

        debug!(event_id = %id, affected, "event deleted");
        Ok(affected)
    }

    /// Un-tombstones the event row. Junction rows stay as they are; they
    /// come back through the ambulance/hospital restore cascades.
    pub async fn restore_event(
        &self,
        caller: Option<Role>,
        id: EventId,
    ) -> Result<Event, ServiceError> {
        self.gate().check(caller, acl::EVENT_MANAGE)?;

        let scope = self.store().begin().await?;
        self.store().events().restore(&IdFilter::by_id(id)).await?;
        scope.commit().await?;

        self.require_event(id).await
    }

    /// Links each ambulance to the event. Idempotent per pair.
    pub async fn add_ambulances_to_event(
        &self,
        caller: Option<Role>,
        event_id: EventId,
        ambulance_ids: &[AmbulanceId],
    ) -> Result<Event, ServiceError> {
        self.gate().check(caller, acl::EVENT_MANAGE)?;
        self.attach(self.store().event_ambulances(), self.store().ambulances(), event_id, ambulance_ids)
            .await?;
        self.require_event(event_id).await
    }

    /// Unlinks each ambulance from the event (plain tombstone).
    pub async fn delete_ambulances_from_event(
        &self,
        caller: Option<Role>,
        event_id: EventId,
        ambulance_ids: &[AmbulanceId],
    ) -> Result<Event, ServiceError> {
        self.gate().check(caller, acl::EVENT_MANAGE)?;
        self.detach::<EventAmbulance>(self.store().event_ambulances(), event_id, ambulance_ids)
            .await?;
        self.require_event(event_id).await
    }

    /// Links each hospital to the event. Idempotent per pair.
    pub async fn add_hospitals_to_event(
        &self,
        caller: Option<Role>,
        event_id: EventId,
        hospital_ids: &[HospitalId],
    ) -> Result<Event, ServiceError> {
        self.gate().check(caller, acl::EVENT_MANAGE)?;
        self.attach(self.store().event_hospitals(), self.store().hospitals(), event_id, hospital_ids)
            .await?;
        self.require_event(event_id).await
    }

    /// Unlinks each hospital from the event (plain tombstone).
    pub async fn delete_hospitals_from_event(
        &self,
        caller: Option<Role>,
        event_id: EventId,
        hospital_ids: &[HospitalId],
    ) -> Result<Event, ServiceError> {
        self.gate().check(caller, acl::EVENT_MANAGE)?;
        self.detach::<EventHospital>(self.store().event_hospitals(), event_id, hospital_ids)
            .await?;
        self.require_event(event_id).await
    }

    /// Live ambulances linked to the event.
    pub async fn ambulances_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<Ambulance>, ServiceError> {
        let links = self
            .store()
            .event_ambulances()
            .find_where(&LinkFilter::by_event(event_id), Visibility::Live)
            .await?;
        let mut rows = Vec::with_capacity(links.len());
        for link in links {
            if let Some(ambulance) = self
                .store()
                .ambulances()
                .find_by_id(link.ambulance_id, Visibility::Live)
                .await?
            {
                rows.push(ambulance);
            }
        }
        rows.sort_by_key(|a| a.id);
        Ok(rows)
    }

    /// Live hospitals linked to the event.
    pub async fn hospitals_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<Hospital>, ServiceError> {
        let links = self
            .store()
            .event_hospitals()
            .find_where(&LinkFilter::by_event(event_id), Visibility::Live)
            .await?;
        let mut rows = Vec::with_capacity(links.len());
        for link in links {
            if let Some(hospital) = self
                .store()
                .hospitals()
                .find_by_id(link.hospital_id, Visibility::Live)
                .await?
            {
                rows.push(hospital);
            }
        }
        rows.sort_by_key(|h| h.id);
        Ok(rows)
    }

    async fn require_event(&self, id: EventId) -> Result<Event, ServiceError> {
        self.get_event(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Event, id))
    }

    /// Validates the event and the whole id set, then upserts each link
    /// inside one scope.
    async fn attach<J, O>(
        &self,
        junctions: &dyn Repository<J>,
        others: &dyn Repository<O>,
        event_id: EventId,
        ids: &[J::OtherId],
    ) -> Result<(), ServiceError>
    where
        J: Junction,
        O: Record<Id = J::OtherId>,
    {
        ensure_exists(self.store().events(), event_id, Visibility::Live).await?;
        ensure_all_exist(others, ids, Visibility::Live).await?;

        let scope = self.store().begin().await?;
        let links = Links::new(junctions, self.store().events());
        for &id in ids {
            links.upsert(event_id, id).await?;
        }
        scope.commit().await?;
        Ok(())
    }

    /// Unlinks each id from the event inside one scope.
    async fn detach<J: Junction>(
        &self,
        junctions: &dyn Repository<J>,
        event_id: EventId,
        ids: &[J::OtherId],
    ) -> Result<(), ServiceError> {
        ensure_exists(self.store().events(), event_id, Visibility::Live).await?;

        let scope = self.store().begin().await?;
        let links = Links::new(junctions, self.store().events());
        for &id in ids {
            links.unlink(event_id, id).await?;
        }
        scope.commit().await?;
        Ok(())
    }
}
