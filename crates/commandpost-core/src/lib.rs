//! Domain model for the commandpost emergency-logistics backend.
//!
//! This crate defines the entities coordinated during an emergency event
//! (users, events, ambulances, hospitals, collection points, patients and
//! the event link tables), their typed ids, and the patch types used by
//! update mutations. It carries no storage or transport concerns.

pub mod change;
pub mod id;
pub mod kind;
pub mod meta;
pub mod model;
pub mod roles;

pub use change::Change;
pub use id::{
    AmbulanceId, CollectionPointId, EventId, HospitalId, LinkId, PatientId, UserId,
};
pub use kind::EntityKind;
pub use meta::RowMeta;
pub use model::{
    Ambulance, AmbulancePatch, CollectionPoint, CollectionPointPatch, Event, EventAmbulance,
    EventHospital, EventPatch, Gender, Hospital, HospitalPatch, NewAmbulance, NewCollectionPoint,
    NewEvent, NewEventAmbulance, NewEventHospital, NewHospital, NewPatient, NewUser, Patient,
    PatientPatch, PatientStatus, TriageCategory, User, UserPatch,
};
pub use roles::{Role, RoleParseError};
