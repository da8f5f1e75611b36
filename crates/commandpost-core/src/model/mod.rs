//! Entity definitions.
//!
//! Each entity comes in three shapes: the stored row (with [`RowMeta`]
//! bookkeeping), a `New*` struct carrying the fields of a create mutation,
//! and a `*Patch` struct of [`Change`] fields for updates.
//!
//! [`RowMeta`]: crate::meta::RowMeta
//! [`Change`]: crate::change::Change

mod ambulance;
mod collection_point;
mod event;
mod hospital;
mod links;
mod patient;
mod user;

pub use ambulance::{Ambulance, AmbulancePatch, NewAmbulance};
pub use collection_point::{CollectionPoint, CollectionPointPatch, NewCollectionPoint};
pub use event::{Event, EventPatch, NewEvent};
pub use hospital::{Hospital, HospitalPatch, NewHospital};
pub use links::{EventAmbulance, EventHospital, NewEventAmbulance, NewEventHospital};
pub use patient::{Gender, NewPatient, Patient, PatientPatch, PatientStatus, TriageCategory};
pub use user::{NewUser, User, UserPatch};
