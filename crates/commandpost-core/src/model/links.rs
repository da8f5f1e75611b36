//! Junction rows for the event many-to-many associations.
//!
//! Intended invariant: at most one live row per (event, other) pair.
//! Duplicate live rows are a data anomaly; the linking operation collapses
//! them rather than letting them accumulate.

use serde::{Deserialize, Serialize};

use crate::id::{AmbulanceId, EventId, HospitalId, LinkId};
use crate::meta::RowMeta;

/// Assignment of an ambulance to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventAmbulance {
    pub id: LinkId,
    pub event_id: EventId,
    pub ambulance_id: AmbulanceId,
    pub meta: RowMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewEventAmbulance {
    pub event_id: EventId,
    pub ambulance_id: AmbulanceId,
}

/// Assignment of a hospital to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventHospital {
    pub id: LinkId,
    pub event_id: EventId,
    pub hospital_id: HospitalId,
    pub meta: RowMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewEventHospital {
    pub event_id: EventId,
    pub hospital_id: HospitalId,
}
