//! Typed row ids.
//!
//! Every entity gets its own id newtype so a patient id cannot be passed
//! where a hospital id is expected. The raw representation is `i64`,
//! matching the backing store's integer keys.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wraps a raw id value.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw id value.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

entity_id!(
    /// Id of a [`crate::model::User`] row.
    UserId
);
entity_id!(
    /// Id of an [`crate::model::Event`] row.
    EventId
);
entity_id!(
    /// Id of an [`crate::model::Ambulance`] row.
    AmbulanceId
);
entity_id!(
    /// Id of a [`crate::model::Hospital`] row.
    HospitalId
);
entity_id!(
    /// Id of a [`crate::model::CollectionPoint`] row.
    CollectionPointId
);
entity_id!(
    /// Id of a [`crate::model::Patient`] row.
    PatientId
);
entity_id!(
    /// Id of a junction row linking an event to an ambulance or hospital.
    LinkId
);
