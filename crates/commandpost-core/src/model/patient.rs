use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::change::Change;
use crate::id::{AmbulanceId, CollectionPointId, HospitalId, PatientId};
use crate::meta::RowMeta;

/// A patient registered at a collection point.
///
/// `status` is an entity-level lifecycle field; a user-facing delete sets
/// it to [`PatientStatus::Deleted`] and leaves the row live. The row-level
/// tombstone in `meta` is a separate, system-level deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub gender: Gender,
    pub age: i32,
    pub run_number: i32,
    pub barcode_value: String,
    pub status: PatientStatus,
    pub triage_category: TriageCategory,
    pub triage_level: i32,
    pub notes: Option<String>,
    pub transport_time: Option<OffsetDateTime>,
    /// Mandatory: every patient is registered at a collection point.
    pub collection_point_id: CollectionPointId,
    pub hospital_id: Option<HospitalId>,
    pub ambulance_id: Option<AmbulanceId>,
    pub meta: RowMeta,
}

/// Fields of a patient create mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPatient {
    pub gender: Gender,
    pub age: i32,
    pub run_number: i32,
    pub barcode_value: String,
    pub status: PatientStatus,
    pub triage_category: TriageCategory,
    pub triage_level: i32,
    pub notes: Option<String>,
    pub transport_time: Option<OffsetDateTime>,
    pub collection_point_id: CollectionPointId,
    pub hospital_id: Option<HospitalId>,
    pub ambulance_id: Option<AmbulanceId>,
}

/// Patient updates. Optional references use `Change<Option<_>>` so an
/// omitted field leaves the association unchanged while an explicit null
/// clears it.
#[derive(Debug, Clone, Default)]
pub struct PatientPatch {
    pub gender: Change<Gender>,
    pub age: Change<i32>,
    pub run_number: Change<i32>,
    pub barcode_value: Change<String>,
    pub status: Change<PatientStatus>,
    pub triage_category: Change<TriageCategory>,
    pub triage_level: Change<i32>,
    pub notes: Change<Option<String>>,
    pub transport_time: Change<Option<OffsetDateTime>>,
    pub collection_point_id: Change<CollectionPointId>,
    pub hospital_id: Change<Option<HospitalId>>,
    pub ambulance_id: Change<Option<AmbulanceId>>,
}

impl PatientPatch {
    /// A patch that only flips the lifecycle status.
    #[must_use]
    pub fn status(status: PatientStatus) -> Self {
        Self {
            status: Change::Set(status),
            ..Self::default()
        }
    }
}

/// Entity-level patient lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatientStatus {
    OnSite,
    Transported,
    Released,
    /// User-facing deletion; the row stays live.
    Deleted,
}

impl PatientStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnSite => "ON_SITE",
            Self::Transported => "TRANSPORTED",
            Self::Released => "RELEASED",
            Self::Deleted => "DELETED",
        }
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-triage color code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriageCategory {
    Green,
    Yellow,
    Red,
    Black,
    White,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
    Unknown,
}
