use serde::{Deserialize, Serialize};

use crate::change::Change;
use crate::id::AmbulanceId;
use crate::meta::RowMeta;

/// An ambulance available for assignment to events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ambulance {
    pub id: AmbulanceId,
    pub vehicle_number: String,
    pub meta: RowMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAmbulance {
    pub vehicle_number: String,
}

#[derive(Debug, Clone, Default)]
pub struct AmbulancePatch {
    pub vehicle_number: Change<String>,
}
