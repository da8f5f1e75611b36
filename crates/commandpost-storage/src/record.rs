//! The [`Record`] trait ties the domain entities to the repository
//! contract: typed id, row metadata access, construction from a `New`
//! payload, patch application and filter matching. Backends stay generic
//! over it instead of duplicating per-table plumbing.

use std::fmt;
use std::hash::Hash;

use time::OffsetDateTime;

use commandpost_core::{
    Ambulance, AmbulanceId, AmbulancePatch, CollectionPoint, CollectionPointId,
    CollectionPointPatch, EntityKind, Event, EventAmbulance, EventHospital, EventId, EventPatch,
    Hospital, HospitalId, HospitalPatch, LinkId, NewAmbulance, NewCollectionPoint, NewEvent,
    NewEventAmbulance, NewEventHospital, NewHospital, NewPatient, NewUser, Patient, PatientId,
    PatientPatch, RowMeta, User, UserId, UserPatch,
};

use crate::types::{IdFilter, LinkFilter, PatientFilter};

/// Bound shared by every typed row id.
pub trait RecordId:
    Copy + Eq + Hash + Ord + fmt::Display + From<i64> + Into<i64> + Send + Sync + 'static
{
}

impl<T> RecordId for T where
    T: Copy + Eq + Hash + Ord + fmt::Display + From<i64> + Into<i64> + Send + Sync + 'static
{
}

/// A storable entity.
pub trait Record: Clone + Send + Sync + 'static {
    /// Typed id of this entity.
    type Id: RecordId;
    /// Payload of a create operation.
    type New: Send + 'static;
    /// Payload of an update operation.
    type Patch: Send + 'static;
    /// Row selector for bulk operations.
    type Filter: Default + Send + Sync + 'static;

    /// The table this record belongs to, for error messages and logs.
    const KIND: EntityKind;

    fn id(&self) -> Self::Id;
    fn meta(&self) -> &RowMeta;
    fn meta_mut(&mut self) -> &mut RowMeta;

    /// Builds a fresh row from a create payload.
    fn build(id: Self::Id, new: Self::New, now: OffsetDateTime) -> Self;

    /// Applies a patch to the row's own fields. Metadata is touched by the
    /// repository, not here.
    fn apply(&mut self, patch: Self::Patch);

    /// Whether this row is selected by the filter, tombstone state aside.
    fn matches(&self, filter: &Self::Filter) -> bool;
}

/// A junction row linking an event to another entity.
pub trait Junction: Record<Filter = LinkFilter<Self::OtherId>> {
    /// Id type of the non-event side.
    type OtherId: RecordId;

    /// The kind of the non-event side, for error messages.
    const OTHER_KIND: EntityKind;

    fn event_id(&self) -> EventId;
    fn other_id(&self) -> Self::OtherId;

    /// Create payload for a live link of the given pair.
    fn link(event_id: EventId, other_id: Self::OtherId) -> Self::New;
}

impl Record for User {
    type Id = UserId;
    type New = NewUser;
    type Patch = UserPatch;
    type Filter = IdFilter<UserId>;

    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> UserId {
        self.id
    }

    fn meta(&self) -> &RowMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RowMeta {
        &mut self.meta
    }

    fn build(id: UserId, new: NewUser, now: OffsetDateTime) -> Self {
        Self {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            password: new.password,
            access_level: new.access_level,
            emergency_contact: new.emergency_contact,
            meta: RowMeta::new(now),
        }
    }

    fn apply(&mut self, patch: UserPatch) {
        patch.first_name.apply_to(&mut self.first_name);
        patch.last_name.apply_to(&mut self.last_name);
        patch.email.apply_to(&mut self.email);
        patch.access_level.apply_to(&mut self.access_level);
        patch.emergency_contact.apply_to(&mut self.emergency_contact);
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        filter.id.is_none_or(|id| id == self.id)
    }
}

impl Record for Event {
    type Id = EventId;
    type New = NewEvent;
    type Patch = EventPatch;
    type Filter = IdFilter<EventId>;

    const KIND: EntityKind = EntityKind::Event;

    fn id(&self) -> EventId {
        self.id
    }

    fn meta(&self) -> &RowMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RowMeta {
        &mut self.meta
    }

    fn build(id: EventId, new: NewEvent, now: OffsetDateTime) -> Self {
        Self {
            id,
            name: new.name,
            event_date: new.event_date,
            created_by: new.created_by,
            is_active: new.is_active,
            meta: RowMeta::new(now),
        }
    }

    fn apply(&mut self, patch: EventPatch) {
        patch.name.apply_to(&mut self.name);
        patch.event_date.apply_to(&mut self.event_date);
        patch.created_by.apply_to(&mut self.created_by);
        patch.is_active.apply_to(&mut self.is_active);
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        filter.id.is_none_or(|id| id == self.id)
    }
}

impl Record for Ambulance {
    type Id = AmbulanceId;
    type New = NewAmbulance;
    type Patch = AmbulancePatch;
    type Filter = IdFilter<AmbulanceId>;

    const KIND: EntityKind = EntityKind::Ambulance;

    fn id(&self) -> AmbulanceId {
        self.id
    }

    fn meta(&self) -> &RowMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RowMeta {
        &mut self.meta
    }

    fn build(id: AmbulanceId, new: NewAmbulance, now: OffsetDateTime) -> Self {
        Self {
            id,
            vehicle_number: new.vehicle_number,
            meta: RowMeta::new(now),
        }
    }

    fn apply(&mut self, patch: AmbulancePatch) {
        patch.vehicle_number.apply_to(&mut self.vehicle_number);
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        filter.id.is_none_or(|id| id == self.id)
    }
}

impl Record for Hospital {
    type Id = HospitalId;
    type New = NewHospital;
    type Patch = HospitalPatch;
    type Filter = IdFilter<HospitalId>;

    const KIND: EntityKind = EntityKind::Hospital;

    fn id(&self) -> HospitalId {
        self.id
    }

    fn meta(&self) -> &RowMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RowMeta {
        &mut self.meta
    }

    fn build(id: HospitalId, new: NewHospital, now: OffsetDateTime) -> Self {
        Self {
            id,
            name: new.name,
            meta: RowMeta::new(now),
        }
    }

    fn apply(&mut self, patch: HospitalPatch) {
        patch.name.apply_to(&mut self.name);
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        filter.id.is_none_or(|id| id == self.id)
    }
}

impl Record for CollectionPoint {
    type Id = CollectionPointId;
    type New = NewCollectionPoint;
    type Patch = CollectionPointPatch;
    type Filter = IdFilter<CollectionPointId>;

    const KIND: EntityKind = EntityKind::CollectionPoint;

    fn id(&self) -> CollectionPointId {
        self.id
    }

    fn meta(&self) -> &RowMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RowMeta {
        &mut self.meta
    }

    fn build(id: CollectionPointId, new: NewCollectionPoint, now: OffsetDateTime) -> Self {
        Self {
            id,
            name: new.name,
            event_id: new.event_id,
            created_by: new.created_by,
            meta: RowMeta::new(now),
        }
    }

    fn apply(&mut self, patch: CollectionPointPatch) {
        patch.name.apply_to(&mut self.name);
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        filter.id.is_none_or(|id| id == self.id)
    }
}

impl Record for Patient {
    type Id = PatientId;
    type New = NewPatient;
    type Patch = PatientPatch;
    type Filter = PatientFilter;

    const KIND: EntityKind = EntityKind::Patient;

    fn id(&self) -> PatientId {
        self.id
    }

    fn meta(&self) -> &RowMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RowMeta {
        &mut self.meta
    }

    fn build(id: PatientId, new: NewPatient, now: OffsetDateTime) -> Self {
        Self {
            id,
            gender: new.gender,
            age: new.age,
            run_number: new.run_number,
            barcode_value: new.barcode_value,
            status: new.status,
            triage_category: new.triage_category,
            triage_level: new.triage_level,
            notes: new.notes,
            transport_time: new.transport_time,
            collection_point_id: new.collection_point_id,
            hospital_id: new.hospital_id,
            ambulance_id: new.ambulance_id,
            meta: RowMeta::new(now),
        }
    }

    fn apply(&mut self, patch: PatientPatch) {
        patch.gender.apply_to(&mut self.gender);
        patch.age.apply_to(&mut self.age);
        patch.run_number.apply_to(&mut self.run_number);
        patch.barcode_value.apply_to(&mut self.barcode_value);
        patch.status.apply_to(&mut self.status);
        patch.triage_category.apply_to(&mut self.triage_category);
        patch.triage_level.apply_to(&mut self.triage_level);
        patch.notes.apply_to(&mut self.notes);
        patch.transport_time.apply_to(&mut self.transport_time);
        patch.collection_point_id.apply_to(&mut self.collection_point_id);
        patch.hospital_id.apply_to(&mut self.hospital_id);
        patch.ambulance_id.apply_to(&mut self.ambulance_id);
    }

    fn matches(&self, filter: &PatientFilter) -> bool {
        filter.id.is_none_or(|id| id == self.id)
            && filter
                .collection_point_id
                .is_none_or(|id| id == self.collection_point_id)
            && filter.hospital_id.is_none_or(|id| Some(id) == self.hospital_id)
            && filter
                .ambulance_id
                .is_none_or(|id| Some(id) == self.ambulance_id)
    }
}

impl Record for EventAmbulance {
    type Id = LinkId;
    type New = NewEventAmbulance;
    type Patch = ();
    type Filter = LinkFilter<AmbulanceId>;

    const KIND: EntityKind = EntityKind::EventAmbulance;

    fn id(&self) -> LinkId {
        self.id
    }

    fn meta(&self) -> &RowMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RowMeta {
        &mut self.meta
    }

    fn build(id: LinkId, new: NewEventAmbulance, now: OffsetDateTime) -> Self {
        Self {
            id,
            event_id: new.event_id,
            ambulance_id: new.ambulance_id,
            meta: RowMeta::new(now),
        }
    }

    fn apply(&mut self, (): ()) {}

    fn matches(&self, filter: &LinkFilter<AmbulanceId>) -> bool {
        filter.event_id.is_none_or(|id| id == self.event_id)
            && filter.other_id.is_none_or(|id| id == self.ambulance_id)
    }
}

impl Junction for EventAmbulance {
    type OtherId = AmbulanceId;

    const OTHER_KIND: EntityKind = EntityKind::Ambulance;

    fn event_id(&self) -> EventId {
        self.event_id
    }

    fn other_id(&self) -> AmbulanceId {
        self.ambulance_id
    }

    fn link(event_id: EventId, other_id: AmbulanceId) -> NewEventAmbulance {
        NewEventAmbulance {
            event_id,
            ambulance_id: other_id,
        }
    }
}

impl Record for EventHospital {
    type Id = LinkId;
    type New = NewEventHospital;
    type Patch = ();
    type Filter = LinkFilter<HospitalId>;

    const KIND: EntityKind = EntityKind::EventHospital;

    fn id(&self) -> LinkId {
        self.id
    }

    fn meta(&self) -> &RowMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RowMeta {
        &mut self.meta
    }

    fn build(id: LinkId, new: NewEventHospital, now: OffsetDateTime) -> Self {
        Self {
            id,
            event_id: new.event_id,
            hospital_id: new.hospital_id,
            meta: RowMeta::new(now),
        }
    }

    fn apply(&mut self, (): ()) {}

    fn matches(&self, filter: &LinkFilter<HospitalId>) -> bool {
        filter.event_id.is_none_or(|id| id == self.event_id)
            && filter.other_id.is_none_or(|id| id == self.hospital_id)
    }
}

impl Junction for EventHospital {
    type OtherId = HospitalId;

    const OTHER_KIND: EntityKind = EntityKind::Hospital;

    fn event_id(&self) -> EventId {
        self.event_id
    }

    fn other_id(&self) -> HospitalId {
        self.hospital_id
    }

    fn link(event_id: EventId, other_id: HospitalId) -> NewEventHospital {
        NewEventHospital {
            event_id,
            hospital_id: other_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commandpost_core::{Change, Gender, PatientStatus, TriageCategory};

    fn sample_patient() -> Patient {
        Patient::build(
            PatientId::new(1),
            NewPatient {
                gender: Gender::Female,
                age: 34,
                run_number: 12,
                barcode_value: "CP-0012".into(),
                status: PatientStatus::OnSite,
                triage_category: TriageCategory::Yellow,
                triage_level: 2,
                notes: None,
                transport_time: None,
                collection_point_id: CollectionPointId::new(5),
                hospital_id: Some(HospitalId::new(9)),
                ambulance_id: None,
            },
            OffsetDateTime::from_unix_timestamp(1_000).unwrap(),
        )
    }

    #[test]
    fn test_patient_filter_matches_foreign_keys() {
        let patient = sample_patient();

        assert!(patient.matches(&PatientFilter::by_hospital(HospitalId::new(9))));
        assert!(!patient.matches(&PatientFilter::by_hospital(HospitalId::new(8))));
        // Unassigned ambulance never matches an ambulance filter.
        assert!(!patient.matches(&PatientFilter::by_ambulance(AmbulanceId::new(1))));
        assert!(patient.matches(&PatientFilter::default()));
    }

    #[test]
    fn test_patch_leaves_unset_fields_alone() {
        let mut patient = sample_patient();
        patient.apply(PatientPatch {
            age: Change::Set(35),
            hospital_id: Change::Set(None),
            ..PatientPatch::default()
        });

        assert_eq!(patient.age, 35);
        assert_eq!(patient.hospital_id, None);
        // Untouched fields keep their values.
        assert_eq!(patient.status, PatientStatus::OnSite);
        assert_eq!(patient.collection_point_id, CollectionPointId::new(5));
    }

    #[test]
    fn test_link_filter_addresses_both_sides() {
        let link = EventAmbulance::build(
            LinkId::new(1),
            EventAmbulance::link(EventId::new(2), AmbulanceId::new(3)),
            OffsetDateTime::from_unix_timestamp(1_000).unwrap(),
        );

        assert!(link.matches(&LinkFilter::pair(EventId::new(2), AmbulanceId::new(3))));
        assert!(link.matches(&LinkFilter::by_event(EventId::new(2))));
        assert!(link.matches(&LinkFilter::by_other(AmbulanceId::new(3))));
        assert!(!link.matches(&LinkFilter::pair(EventId::new(2), AmbulanceId::new(4))));
    }
}
