//! Visibility and filter types shared by all repositories.

use commandpost_core::{AmbulanceId, CollectionPointId, EventId, HospitalId, PatientId};

/// Whether a query sees tombstoned rows.
///
/// Mirrors the `paranoid` flag of the original data layer: `Live` is the
/// default everywhere, `IncludeDeleted` opts into tombstoned rows for
/// restore paths and dependency counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Only rows without a tombstone.
    #[default]
    Live,
    /// Every row, tombstoned or not.
    IncludeDeleted,
}

impl Visibility {
    /// Whether a row with the given tombstone state passes this visibility.
    #[must_use]
    pub fn admits(self, deleted: bool) -> bool {
        match self {
            Self::Live => !deleted,
            Self::IncludeDeleted => true,
        }
    }
}

/// Filter for entities addressed by id only.
///
/// The default value matches every row, so `soft_delete(&IdFilter::default())`
/// would tombstone the whole table; callers narrow it with [`IdFilter::by_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdFilter<I> {
    pub id: Option<I>,
}

impl<I> Default for IdFilter<I> {
    fn default() -> Self {
        Self { id: None }
    }
}

impl<I> IdFilter<I> {
    /// Matches exactly the row with the given id.
    #[must_use]
    pub fn by_id(id: I) -> Self {
        Self { id: Some(id) }
    }
}

/// Filter for junction rows, addressable by either side of the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkFilter<O> {
    pub event_id: Option<EventId>,
    pub other_id: Option<O>,
}

impl<O> Default for LinkFilter<O> {
    fn default() -> Self {
        Self {
            event_id: None,
            other_id: None,
        }
    }
}

impl<O> LinkFilter<O> {
    /// Matches the rows for one (event, other) pair.
    #[must_use]
    pub fn pair(event_id: EventId, other_id: O) -> Self {
        Self {
            event_id: Some(event_id),
            other_id: Some(other_id),
        }
    }

    /// Matches every row of the given event.
    #[must_use]
    pub fn by_event(event_id: EventId) -> Self {
        Self {
            event_id: Some(event_id),
            other_id: None,
        }
    }

    /// Matches every row of the given ambulance or hospital.
    #[must_use]
    pub fn by_other(other_id: O) -> Self {
        Self {
            event_id: None,
            other_id: Some(other_id),
        }
    }
}

/// Filter for patient rows, addressable by id or by any foreign key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatientFilter {
    pub id: Option<PatientId>,
    pub collection_point_id: Option<CollectionPointId>,
    pub hospital_id: Option<HospitalId>,
    pub ambulance_id: Option<AmbulanceId>,
}

impl PatientFilter {
    /// Matches exactly the patient with the given id.
    #[must_use]
    pub fn by_id(id: PatientId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Matches every patient registered at the given collection point.
    #[must_use]
    pub fn by_collection_point(id: CollectionPointId) -> Self {
        Self {
            collection_point_id: Some(id),
            ..Self::default()
        }
    }

    /// Matches every patient assigned to the given hospital.
    #[must_use]
    pub fn by_hospital(id: HospitalId) -> Self {
        Self {
            hospital_id: Some(id),
            ..Self::default()
        }
    }

    /// Matches every patient assigned to the given ambulance.
    #[must_use]
    pub fn by_ambulance(id: AmbulanceId) -> Self {
        Self {
            ambulance_id: Some(id),
            ..Self::default()
        }
    }
}
