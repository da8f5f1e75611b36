//! Query and mutation roots.
//!
//! One resolver per API operation, each a thin adapter: unpack arguments
//! into domain types, call the matching service orchestrator with the
//! request's caller role, wrap the result. All rules live in the service.

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, MaybeUndefined, Object, Schema};
use time::OffsetDateTime;

use commandpost_core::{
    AmbulanceId, AmbulancePatch, Change, CollectionPointId, CollectionPointPatch, EventId,
    HospitalId, HospitalPatch, NewAmbulance, NewCollectionPoint, NewEvent, NewHospital,
    NewPatient, NewUser, PatientId, PatientPatch, UserId, UserPatch,
};
use commandpost_service::{CommandService, EventUpdate};

use crate::context::{caller_role, service};
use crate::error::service_error_to_graphql;
use crate::types::{
    AmbulanceObject, CollectionPointObject, EventObject, Gender, HospitalObject, PatientObject,
    PatientStatus, Role, TriageCategory, UserObject,
};

pub type CommandSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the schema with the service attached as global data.
pub fn build_schema(service: Arc<CommandService>) -> CommandSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(service)
        .finish()
}

fn set_or_keep<T, U: From<T>>(value: Option<T>) -> Change<U> {
    match value {
        Some(value) => Change::Set(value.into()),
        None => Change::Keep,
    }
}

fn set_clear_or_keep<T, U: From<T>>(value: MaybeUndefined<T>) -> Change<Option<U>> {
    match value {
        MaybeUndefined::Undefined => Change::Keep,
        MaybeUndefined::Null => Change::Set(None),
        MaybeUndefined::Value(value) => Change::Set(Some(value.into())),
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn users(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<UserObject>> {
        let rows = service(ctx)?
            .list_users()
            .await
            .map_err(service_error_to_graphql)?;
        Ok(rows.into_iter().map(UserObject).collect())
    }

    async fn user(&self, ctx: &Context<'_>, id: i64) -> async_graphql::Result<Option<UserObject>> {
        let row = service(ctx)?
            .get_user(UserId::new(id))
            .await
            .map_err(service_error_to_graphql)?;
        Ok(row.map(UserObject))
    }

    async fn events(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<EventObject>> {
        let rows = service(ctx)?
            .list_events()
            .await
            .map_err(service_error_to_graphql)?;
        Ok(rows.into_iter().map(EventObject).collect())
    }

    async fn event(
        &self,
        ctx: &Context<'_>,
        id: i64,
    ) -> async_graphql::Result<Option<EventObject>> {
        let row = service(ctx)?
            .get_event(EventId::new(id))
            .await
            .map_err(service_error_to_graphql)?;
        Ok(row.map(EventObject))
    }

    async fn ambulances(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<AmbulanceObject>> {
        let rows = service(ctx)?
            .list_ambulances(caller_role(ctx))
            .await
            .map_err(service_error_to_graphql)?;
        Ok(rows.into_iter().map(AmbulanceObject).collect())
    }

    async fn ambulance(
        &self,
        ctx: &Context<'_>,
        id: i64,
    ) -> async_graphql::Result<Option<AmbulanceObject>> {
        let row = service(ctx)?
            .get_ambulance(caller_role(ctx), AmbulanceId::new(id))
            .await
            .map_err(service_error_to_graphql)?;
        Ok(row.map(AmbulanceObject))
    }

    async fn hospitals(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<HospitalObject>> {
        let rows = service(ctx)?
            .list_hospitals()
            .await
            .map_err(service_error_to_graphql)?;
        Ok(rows.into_iter().map(HospitalObject).collect())
    }

    async fn hospital(
        &self,
        ctx: &Context<'_>,
        id: i64,
    ) -> async_graphql::Result<Option<HospitalObject>> {
        let row = service(ctx)?
            .get_hospital(HospitalId::new(id))
            .await
            .map_err(service_error_to_graphql)?;
        Ok(row.map(HospitalObject))
    }

    async fn collection_points(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<CollectionPointObject>> {
        let rows = service(ctx)?
            .list_collection_points()
            .await
            .map_err(service_error_to_graphql)?;
        Ok(rows.into_iter().map(CollectionPointObject).collect())
    }

    async fn collection_point(
        &self,
        ctx: &Context<'_>,
        id: i64,
    ) -> async_graphql::Result<Option<CollectionPointObject>> {
        let row = service(ctx)?
            .get_collection_point(CollectionPointId::new(id))
            .await
            .map_err(service_error_to_graphql)?;
        Ok(row.map(CollectionPointObject))
    }

    async fn patients(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<PatientObject>> {
        let rows = service(ctx)?
            .list_patients()
            .await
            .map_err(service_error_to_graphql)?;
        Ok(rows.into_iter().map(PatientObject).collect())
    }

    async fn patient(
        &self,
        ctx: &Context<'_>,
        id: i64,
    ) -> async_graphql::Result<Option<PatientObject>> {
        let row = service(ctx)?
            .get_patient(PatientId::new(id))
            .await
            .map_err(service_error_to_graphql)?;
        Ok(row.map(PatientObject))
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    // ==================== Users ====================

    #[allow(clippy::too_many_arguments)]
    async fn add_user(
        &self,
        ctx: &Context<'_>,
        first_name: String,
        last_name: String,
        email: String,
        password: String,
        access_level: Role,
        emergency_contact: Option<String>,
    ) -> async_graphql::Result<UserObject> {
        let user = service(ctx)?
            .add_user(
                caller_role(ctx),
                NewUser {
                    first_name,
                    last_name,
                    email,
                    password,
                    access_level: access_level.into(),
                    emergency_contact,
                },
            )
            .await
            .map_err(service_error_to_graphql)?;
        Ok(UserObject(user))
    }

    #[allow(clippy::too_many_arguments)]
    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: i64,
        first_name: Option<String>,
        last_name: Option<String>,
        email: Option<String>,
        access_level: Option<Role>,
        emergency_contact: MaybeUndefined<String>,
    ) -> async_graphql::Result<UserObject> {
        let patch = UserPatch {
            first_name: set_or_keep(first_name),
            last_name: set_or_keep(last_name),
            email: set_or_keep(email),
            access_level: set_or_keep(access_level),
            emergency_contact: set_clear_or_keep(emergency_contact),
        };
        let user = service(ctx)?
            .update_user(caller_role(ctx), UserId::new(id), patch)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(UserObject(user))
    }

    /// Returns the number of user rows removed (1 or 0).
    async fn delete_user(&self, ctx: &Context<'_>, id: i64) -> async_graphql::Result<u64> {
        service(ctx)?
            .delete_user(caller_role(ctx), UserId::new(id))
            .await
            .map_err(service_error_to_graphql)
    }

    async fn restore_user(&self, ctx: &Context<'_>, id: i64) -> async_graphql::Result<UserObject> {
        let user = service(ctx)?
            .restore_user(caller_role(ctx), UserId::new(id))
            .await
            .map_err(service_error_to_graphql)?;
        Ok(UserObject(user))
    }

    // ==================== Events ====================

    async fn add_event(
        &self,
        ctx: &Context<'_>,
        name: String,
        event_date: OffsetDateTime,
        created_by: i64,
        is_active: bool,
    ) -> async_graphql::Result<EventObject> {
        let event = service(ctx)?
            .add_event(
                caller_role(ctx),
                NewEvent {
                    name,
                    event_date,
                    created_by: UserId::new(created_by),
                    is_active,
                },
            )
            .await
            .map_err(service_error_to_graphql)?;
        Ok(EventObject(event))
    }

    /// Updates an event. A supplied `ambulances` or `hospitals` list
    /// replaces that relation wholesale; an omitted list leaves it alone.
    #[allow(clippy::too_many_arguments)]
    async fn update_event(
        &self,
        ctx: &Context<'_>,
        id: i64,
        name: Option<String>,
        event_date: Option<OffsetDateTime>,
        created_by: Option<i64>,
        is_active: Option<bool>,
        ambulances: Option<Vec<i64>>,
        hospitals: Option<Vec<i64>>,
    ) -> async_graphql::Result<EventObject> {
        let update = EventUpdate {
            name: set_or_keep(name),
            event_date: set_or_keep(event_date),
            created_by: set_or_keep(created_by),
            is_active: set_or_keep(is_active),
            ambulances: ambulances
                .map(|ids| ids.into_iter().map(AmbulanceId::new).collect()),
            hospitals: hospitals.map(|ids| ids.into_iter().map(HospitalId::new).collect()),
        };
        let event = service(ctx)?
            .update_event(caller_role(ctx), EventId::new(id), update)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(EventObject(event))
    }

    /// Returns the number of event rows removed (1 or 0).
    async fn delete_event(&self, ctx: &Context<'_>, id: i64) -> async_graphql::Result<u64> {
        service(ctx)?
            .delete_event(caller_role(ctx), EventId::new(id))
            .await
            .map_err(service_error_to_graphql)
    }

    async fn restore_event(&self, ctx: &Context<'_>, id: i64) -> async_graphql::Result<EventObject> {
        let event = service(ctx)?
            .restore_event(caller_role(ctx), EventId::new(id))
            .await
            .map_err(service_error_to_graphql)?;
        Ok(EventObject(event))
    }

    async fn add_ambulances_to_event(
        &self,
        ctx: &Context<'_>,
        event_id: i64,
        ambulance_ids: Vec<i64>,
    ) -> async_graphql::Result<EventObject> {
        let ids: Vec<AmbulanceId> = ambulance_ids.into_iter().map(AmbulanceId::new).collect();
        let event = service(ctx)?
            .add_ambulances_to_event(caller_role(ctx), EventId::new(event_id), &ids)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(EventObject(event))
    }

    async fn delete_ambulances_from_event(
        &self,
        ctx: &Context<'_>,
        event_id: i64,
        ambulance_ids: Vec<i64>,
    ) -> async_graphql::Result<EventObject> {
        let ids: Vec<AmbulanceId> = ambulance_ids.into_iter().map(AmbulanceId::new).collect();
        let event = service(ctx)?
            .delete_ambulances_from_event(caller_role(ctx), EventId::new(event_id), &ids)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(EventObject(event))
    }

    async fn add_hospitals_to_event(
        &self,
        ctx: &Context<'_>,
        event_id: i64,
        hospital_ids: Vec<i64>,
    ) -> async_graphql::Result<EventObject> {
        let ids: Vec<HospitalId> = hospital_ids.into_iter().map(HospitalId::new).collect();
        let event = service(ctx)?
            .add_hospitals_to_event(caller_role(ctx), EventId::new(event_id), &ids)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(EventObject(event))
    }

    async fn delete_hospitals_from_event(
        &self,
        ctx: &Context<'_>,
        event_id: i64,
        hospital_ids: Vec<i64>,
    ) -> async_graphql::Result<EventObject> {
        let ids: Vec<HospitalId> = hospital_ids.into_iter().map(HospitalId::new).collect();
        let event = service(ctx)?
            .delete_hospitals_from_event(caller_role(ctx), EventId::new(event_id), &ids)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(EventObject(event))
    }

    // ==================== Ambulances ====================

    async fn add_ambulance(
        &self,
        ctx: &Context<'_>,
        vehicle_number: String,
    ) -> async_graphql::Result<AmbulanceObject> {
        let ambulance = service(ctx)?
            .add_ambulance(caller_role(ctx), NewAmbulance { vehicle_number })
            .await
            .map_err(service_error_to_graphql)?;
        Ok(AmbulanceObject(ambulance))
    }

    async fn update_ambulance(
        &self,
        ctx: &Context<'_>,
        id: i64,
        vehicle_number: Option<String>,
    ) -> async_graphql::Result<AmbulanceObject> {
        let patch = AmbulancePatch {
            vehicle_number: set_or_keep(vehicle_number),
        };
        let ambulance = service(ctx)?
            .update_ambulance(caller_role(ctx), AmbulanceId::new(id), patch)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(AmbulanceObject(ambulance))
    }

    /// Returns the number of ambulance rows removed (1 or 0).
    async fn delete_ambulance(&self, ctx: &Context<'_>, id: i64) -> async_graphql::Result<u64> {
        service(ctx)?
            .delete_ambulance(caller_role(ctx), AmbulanceId::new(id))
            .await
            .map_err(service_error_to_graphql)
    }

    async fn restore_ambulance(
        &self,
        ctx: &Context<'_>,
        id: i64,
    ) -> async_graphql::Result<AmbulanceObject> {
        let ambulance = service(ctx)?
            .restore_ambulance(caller_role(ctx), AmbulanceId::new(id))
            .await
            .map_err(service_error_to_graphql)?;
        Ok(AmbulanceObject(ambulance))
    }

    // ==================== Hospitals ====================

    async fn add_hospital(
        &self,
        ctx: &Context<'_>,
        name: String,
    ) -> async_graphql::Result<HospitalObject> {
        let hospital = service(ctx)?
            .add_hospital(caller_role(ctx), NewHospital { name })
            .await
            .map_err(service_error_to_graphql)?;
        Ok(HospitalObject(hospital))
    }

    async fn update_hospital(
        &self,
        ctx: &Context<'_>,
        id: i64,
        name: Option<String>,
    ) -> async_graphql::Result<HospitalObject> {
        let patch = HospitalPatch {
            name: set_or_keep(name),
        };
        let hospital = service(ctx)?
            .update_hospital(caller_role(ctx), HospitalId::new(id), patch)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(HospitalObject(hospital))
    }

    /// Returns the number of hospital rows removed (1 or 0).
    async fn delete_hospital(&self, ctx: &Context<'_>, id: i64) -> async_graphql::Result<u64> {
        service(ctx)?
            .delete_hospital(caller_role(ctx), HospitalId::new(id))
            .await
            .map_err(service_error_to_graphql)
    }

    async fn restore_hospital(
        &self,
        ctx: &Context<'_>,
        id: i64,
    ) -> async_graphql::Result<HospitalObject> {
        let hospital = service(ctx)?
            .restore_hospital(caller_role(ctx), HospitalId::new(id))
            .await
            .map_err(service_error_to_graphql)?;
        Ok(HospitalObject(hospital))
    }

    // ==================== Collection points ====================

    async fn add_collection_point(
        &self,
        ctx: &Context<'_>,
        name: String,
        event_id: i64,
        created_by: i64,
    ) -> async_graphql::Result<CollectionPointObject> {
        let point = service(ctx)?
            .add_collection_point(
                caller_role(ctx),
                NewCollectionPoint {
                    name,
                    event_id: EventId::new(event_id),
                    created_by: UserId::new(created_by),
                },
            )
            .await
            .map_err(service_error_to_graphql)?;
        Ok(CollectionPointObject(point))
    }

    async fn update_collection_point(
        &self,
        ctx: &Context<'_>,
        id: i64,
        name: Option<String>,
    ) -> async_graphql::Result<CollectionPointObject> {
        let patch = CollectionPointPatch {
            name: set_or_keep(name),
        };
        let point = service(ctx)?
            .update_collection_point(caller_role(ctx), CollectionPointId::new(id), patch)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(CollectionPointObject(point))
    }

    /// Tombstones the collection point and, as a system delete, its
    /// patients. Returns the number of collection point rows removed.
    async fn delete_collection_point(
        &self,
        ctx: &Context<'_>,
        id: i64,
    ) -> async_graphql::Result<u64> {
        service(ctx)?
            .delete_collection_point(caller_role(ctx), CollectionPointId::new(id))
            .await
            .map_err(service_error_to_graphql)
    }

    async fn restore_collection_point(
        &self,
        ctx: &Context<'_>,
        id: i64,
    ) -> async_graphql::Result<CollectionPointObject> {
        let point = service(ctx)?
            .restore_collection_point(caller_role(ctx), CollectionPointId::new(id))
            .await
            .map_err(service_error_to_graphql)?;
        Ok(CollectionPointObject(point))
    }

    // ==================== Patients ====================

    #[allow(clippy::too_many_arguments)]
    async fn add_patient(
        &self,
        ctx: &Context<'_>,
        gender: Gender,
        age: i32,
        run_number: i32,
        barcode_value: String,
        status: PatientStatus,
        triage_category: TriageCategory,
        triage_level: i32,
        notes: Option<String>,
        transport_time: Option<OffsetDateTime>,
        collection_point_id: i64,
        hospital_id: Option<i64>,
        ambulance_id: Option<i64>,
    ) -> async_graphql::Result<PatientObject> {
        let patient = service(ctx)?
            .add_patient(
                caller_role(ctx),
                NewPatient {
                    gender: gender.into(),
                    age,
                    run_number,
                    barcode_value,
                    status: status.into(),
                    triage_category: triage_category.into(),
                    triage_level,
                    notes,
                    transport_time,
                    collection_point_id: CollectionPointId::new(collection_point_id),
                    hospital_id: hospital_id.map(HospitalId::new),
                    ambulance_id: ambulance_id.map(AmbulanceId::new),
                },
            )
            .await
            .map_err(service_error_to_graphql)?;
        Ok(PatientObject(patient))
    }

    /// Updates a patient. For the nullable references and fields, omitting
    /// the argument leaves the stored value unchanged while an explicit
    /// null clears it.
    #[allow(clippy::too_many_arguments)]
    async fn update_patient(
        &self,
        ctx: &Context<'_>,
        id: i64,
        gender: Option<Gender>,
        age: Option<i32>,
        run_number: Option<i32>,
        barcode_value: Option<String>,
        status: Option<PatientStatus>,
        triage_category: Option<TriageCategory>,
        triage_level: Option<i32>,
        notes: MaybeUndefined<String>,
        transport_time: MaybeUndefined<OffsetDateTime>,
        collection_point_id: Option<i64>,
        hospital_id: MaybeUndefined<i64>,
        ambulance_id: MaybeUndefined<i64>,
    ) -> async_graphql::Result<PatientObject> {
        let patch = PatientPatch {
            gender: set_or_keep(gender),
            age: set_or_keep(age),
            run_number: set_or_keep(run_number),
            barcode_value: set_or_keep(barcode_value),
            status: set_or_keep(status),
            triage_category: set_or_keep(triage_category),
            triage_level: set_or_keep(triage_level),
            notes: set_clear_or_keep(notes),
            transport_time: set_clear_or_keep(transport_time),
            collection_point_id: set_or_keep(collection_point_id),
            hospital_id: set_clear_or_keep(hospital_id),
            ambulance_id: set_clear_or_keep(ambulance_id),
        };
        let patient = service(ctx)?
            .update_patient(caller_role(ctx), PatientId::new(id), patch)
            .await
            .map_err(service_error_to_graphql)?;
        Ok(PatientObject(patient))
    }

    /// User-facing delete: flips the patient's status to DELETED without
    /// removing the row. Returns whether a row was affected.
    async fn delete_patient(&self, ctx: &Context<'_>, id: i64) -> async_graphql::Result<bool> {
        service(ctx)?
            .delete_patient(caller_role(ctx), PatientId::new(id))
            .await
            .map_err(service_error_to_graphql)
    }

    async fn restore_patient(
        &self,
        ctx: &Context<'_>,
        id: i64,
    ) -> async_graphql::Result<PatientObject> {
        let patient = service(ctx)?
            .restore_patient(caller_role(ctx), PatientId::new(id))
            .await
            .map_err(service_error_to_graphql)?;
        Ok(PatientObject(patient))
    }
}
