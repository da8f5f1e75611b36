use serde::{Deserialize, Serialize};

use crate::change::Change;
use crate::id::HospitalId;
use crate::meta::RowMeta;

/// A hospital patients can be transported to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: HospitalId,
    pub name: String,
    pub meta: RowMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHospital {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct HospitalPatch {
    pub name: Change<String>,
}
