use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::change::Change;
use crate::id::{EventId, UserId};
use crate::meta::RowMeta;

/// A coordinated emergency event (marathon, festival, mass-casualty
/// incident). Owns ambulance and hospital links through junction rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub event_date: OffsetDateTime,
    /// The user that created the event. Must reference an existing user.
    pub created_by: UserId,
    pub is_active: bool,
    pub meta: RowMeta,
}

/// Fields of an event create mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub name: String,
    pub event_date: OffsetDateTime,
    pub created_by: UserId,
    pub is_active: bool,
}

/// In-place event updates. Link replacement is handled separately by the
/// orchestrator.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub name: Change<String>,
    pub event_date: Change<OffsetDateTime>,
    pub created_by: Change<UserId>,
    pub is_active: Change<bool>,
}
