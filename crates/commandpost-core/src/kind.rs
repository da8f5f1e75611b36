use std::fmt;

use serde::{Deserialize, Serialize};

/// The entity kinds managed by the backend.
///
/// Used in error messages and log fields to name the table a failing id
/// belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    User,
    Event,
    Ambulance,
    Hospital,
    CollectionPoint,
    Patient,
    EventAmbulance,
    EventHospital,
}

impl EntityKind {
    /// Human-readable name, as it appears in error messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Event => "event",
            Self::Ambulance => "ambulance",
            Self::Hospital => "hospital",
            Self::CollectionPoint => "collection point",
            Self::Patient => "patient",
            Self::EventAmbulance => "event-ambulance link",
            Self::EventHospital => "event-hospital link",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
