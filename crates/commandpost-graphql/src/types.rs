//! GraphQL object and enum types.
//!
//! Thin wrappers over the domain entities. Scalar fields read straight
//! from the wrapped row; relation fields go back through the service so
//! association rules (live links only, tombstone visibility) stay in one
//! place.

use async_graphql::{Context, Enum, Object};
use time::OffsetDateTime;

use commandpost_core as domain;

use crate::context::service;
use crate::error::service_error_to_graphql;

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "domain::Role")]
pub enum Role {
    Admin,
    Commander,
    Supervisor,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "domain::PatientStatus")]
pub enum PatientStatus {
    OnSite,
    Transported,
    Released,
    Deleted,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "domain::TriageCategory")]
pub enum TriageCategory {
    Green,
    Yellow,
    Red,
    Black,
    White,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "domain::Gender")]
pub enum Gender {
    Male,
    Female,
    Other,
    Unknown,
}

/// An operator account. The stored password is not part of the schema.
pub struct UserObject(pub domain::User);

#[Object(name = "User")]
impl UserObject {
    async fn id(&self) -> i64 {
        self.0.id.value()
    }

    async fn first_name(&self) -> &str {
        &self.0.first_name
    }

    async fn last_name(&self) -> &str {
        &self.0.last_name
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn access_level(&self) -> Role {
        self.0.access_level.into()
    }

    async fn emergency_contact(&self) -> Option<&str> {
        self.0.emergency_contact.as_deref()
    }
}

pub struct EventObject(pub domain::Event);

#[Object(name = "Event")]
impl EventObject {
    async fn id(&self) -> i64 {
        self.0.id.value()
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn event_date(&self) -> OffsetDateTime {
        self.0.event_date
    }

    async fn is_active(&self) -> bool {
        self.0.is_active
    }

    async fn created_by(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<UserObject>> {
        let service = service(ctx)?;
        let user = service
            .creator_of(self.0.created_by)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(user.map(UserObject))
    }

    /// Live ambulances assigned to this event.
    async fn ambulances(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<AmbulanceObject>> {
        let service = service(ctx)?;
        let rows = service
            .ambulances_for_event(self.0.id)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(rows.into_iter().map(AmbulanceObject).collect())
    }

    /// Live hospitals assigned to this event.
    async fn hospitals(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<HospitalObject>> {
        let service = service(ctx)?;
        let rows = service
            .hospitals_for_event(self.0.id)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(rows.into_iter().map(HospitalObject).collect())
    }
}

pub struct AmbulanceObject(pub domain::Ambulance);

#[Object(name = "Ambulance")]
impl AmbulanceObject {
    async fn id(&self) -> i64 {
        self.0.id.value()
    }

    async fn vehicle_number(&self) -> &str {
        &self.0.vehicle_number
    }

    /// Live events this ambulance is assigned to.
    async fn events(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<EventObject>> {
        let service = service(ctx)?;
        let rows = service
            .events_for_ambulance(self.0.id)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(rows.into_iter().map(EventObject).collect())
    }
}

pub struct HospitalObject(pub domain::Hospital);

#[Object(name = "Hospital")]
impl HospitalObject {
    async fn id(&self) -> i64 {
        self.0.id.value()
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    /// Live events this hospital is assigned to.
    async fn events(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<EventObject>> {
        let service = service(ctx)?;
        let rows = service
            .events_for_hospital(self.0.id)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(rows.into_iter().map(EventObject).collect())
    }
}

pub struct CollectionPointObject(pub domain::CollectionPoint);

#[Object(name = "CollectionPoint")]
impl CollectionPointObject {
    async fn id(&self) -> i64 {
        self.0.id.value()
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn event(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<EventObject>> {
        let service = service(ctx)?;
        let event = service
            .get_event(self.0.event_id)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(event.map(EventObject))
    }

    async fn created_by(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<UserObject>> {
        let service = service(ctx)?;
        let user = service
            .creator_of(self.0.created_by)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(user.map(UserObject))
    }

    /// Live patients registered at this collection point.
    async fn patients(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<PatientObject>> {
        let service = service(ctx)?;
        let rows = service
            .patients_for_collection_point(self.0.id)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(rows.into_iter().map(PatientObject).collect())
    }
}

pub struct PatientObject(pub domain::Patient);

#[Object(name = "Patient")]
impl PatientObject {
    async fn id(&self) -> i64 {
        self.0.id.value()
    }

    async fn gender(&self) -> Gender {
        self.0.gender.into()
    }

    async fn age(&self) -> i32 {
        self.0.age
    }

    async fn run_number(&self) -> i32 {
        self.0.run_number
    }

    async fn barcode_value(&self) -> &str {
        &self.0.barcode_value
    }

    async fn status(&self) -> PatientStatus {
        self.0.status.into()
    }

    async fn triage_category(&self) -> TriageCategory {
        self.0.triage_category.into()
    }

    async fn triage_level(&self) -> i32 {
        self.0.triage_level
    }

    async fn notes(&self) -> Option<&str> {
        self.0.notes.as_deref()
    }

    async fn transport_time(&self) -> Option<OffsetDateTime> {
        self.0.transport_time
    }

    async fn collection_point(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Option<CollectionPointObject>> {
        let service = service(ctx)?;
        let point = service
            .collection_point_of(&self.0)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(point.map(CollectionPointObject))
    }

    async fn hospital(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<HospitalObject>> {
        let service = service(ctx)?;
        let hospital = service
            .hospital_of(&self.0)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(hospital.map(HospitalObject))
    }

    async fn ambulance(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<AmbulanceObject>> {
        let service = service(ctx)?;
        let ambulance = service
            .ambulance_of(&self.0)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(ambulance.map(AmbulanceObject))
    }
}
