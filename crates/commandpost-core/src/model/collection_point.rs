use serde::{Deserialize, Serialize};

use crate::change::Change;
use crate::id::{CollectionPointId, EventId, UserId};
use crate::meta::RowMeta;

/// A casualty collection point inside an event's perimeter. Patients are
/// registered against exactly one collection point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionPoint {
    pub id: CollectionPointId,
    pub name: String,
    pub event_id: EventId,
    pub created_by: UserId,
    pub meta: RowMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCollectionPoint {
    pub name: String,
    pub event_id: EventId,
    pub created_by: UserId,
}

#[derive(Debug, Clone, Default)]
pub struct CollectionPointPatch {
    pub name: Change<String>,
}
