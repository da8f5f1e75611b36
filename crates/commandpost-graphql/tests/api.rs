//! Integration tests for the GraphQL schema.
//!
//! These execute real queries and mutations against the schema wired to
//! the in-memory backend, covering the association lifecycle end to end
//! as a client would see it.

use std::sync::Arc;

use async_graphql::{Request, Variables};
use serde_json::{Value, json};

use commandpost_core::Role;
use commandpost_db_memory::MemoryStore;
use commandpost_graphql::{Caller, CommandSchema, build_schema};
use commandpost_service::CommandService;

fn schema() -> CommandSchema {
    let service = CommandService::new(Arc::new(MemoryStore::new()));
    build_schema(Arc::new(service))
}

async fn execute(schema: &CommandSchema, role: Option<Role>, query: &str) -> Value {
    execute_with_vars(schema, role, query, json!({})).await
}

async fn execute_with_vars(
    schema: &CommandSchema,
    role: Option<Role>,
    query: &str,
    vars: Value,
) -> Value {
    let caller = Caller { role };
    let request = Request::new(query)
        .variables(Variables::from_json(vars))
        .data(caller);
    let response = schema.execute(request).await;
    serde_json::to_value(&response).expect("response serializes")
}

/// Seeds a user and an event, returning their ids.
async fn seed_user_and_event(schema: &CommandSchema) -> (i64, i64) {
    let response = execute(
        schema,
        Some(Role::Admin),
        r#"mutation {
            addUser(
                firstName: "Iris", lastName: "Okafor",
                email: "iris@example.org", password: "pw",
                accessLevel: COMMANDER
            ) { id }
        }"#,
    )
    .await;
    assert_eq!(response["errors"], Value::Null, "{response}");
    let user_id = response["data"]["addUser"]["id"].as_i64().unwrap();

    let query = r#"mutation AddEvent($createdBy: Int!) {
        addEvent(
            name: "Night Run", eventDate: "2026-06-01T09:00:00Z",
            createdBy: $createdBy, isActive: true
        ) { id }
    }"#;
    let response = execute_with_vars(
        schema,
        Some(Role::Commander),
        query,
        json!({ "createdBy": user_id }),
    )
    .await;
    assert_eq!(response["errors"], Value::Null, "{response}");
    let event_id = response["data"]["addEvent"]["id"].as_i64().unwrap();

    (user_id, event_id)
}

async fn seed_ambulance(schema: &CommandSchema, number: &str) -> i64 {
    let query = r#"mutation AddAmbulance($number: String!) {
        addAmbulance(vehicleNumber: $number) { id }
    }"#;
    let response = execute_with_vars(
        schema,
        Some(Role::Commander),
        query,
        json!({ "number": number }),
    )
    .await;
    assert_eq!(response["errors"], Value::Null, "{response}");
    response["data"]["addAmbulance"]["id"].as_i64().unwrap()
}

async fn event_ambulance_ids(schema: &CommandSchema, event_id: i64) -> Vec<i64> {
    let response = execute_with_vars(
        schema,
        None,
        r#"query Event($id: Int!) {
            event(id: $id) { ambulances { id } }
        }"#,
        json!({ "id": event_id }),
    )
    .await;
    assert_eq!(response["errors"], Value::Null, "{response}");
    response["data"]["event"]["ambulances"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn link_twice_then_replace_with_empty_list() {
    let schema = schema();
    let (_, event_id) = seed_user_and_event(&schema).await;
    let ambulance_id = seed_ambulance(&schema, "A-1").await;

    let link = r#"mutation Link($eventId: Int!, $ids: [Int!]!) {
        addAmbulancesToEvent(eventId: $eventId, ambulanceIds: $ids) {
            ambulances { id }
        }
    }"#;
    let vars = json!({ "eventId": event_id, "ids": [ambulance_id] });

    // First link attaches the ambulance.
    let response =
        execute_with_vars(&schema, Some(Role::Commander), link, vars.clone()).await;
    assert_eq!(response["errors"], Value::Null, "{response}");
    assert_eq!(event_ambulance_ids(&schema, event_id).await, vec![ambulance_id]);

    // Second link is idempotent: still exactly one.
    let response = execute_with_vars(&schema, Some(Role::Commander), link, vars).await;
    assert_eq!(response["errors"], Value::Null, "{response}");
    assert_eq!(event_ambulance_ids(&schema, event_id).await, vec![ambulance_id]);

    // Replacing with the empty list clears the relation.
    let response = execute_with_vars(
        &schema,
        Some(Role::Commander),
        r#"mutation Clear($eventId: Int!) {
            updateEvent(id: $eventId, ambulances: []) { ambulances { id } }
        }"#,
        json!({ "eventId": event_id }),
    )
    .await;
    assert_eq!(response["errors"], Value::Null, "{response}");
    assert!(event_ambulance_ids(&schema, event_id).await.is_empty());

    // The tombstoned link restores on re-link, still exactly one.
    let response = execute_with_vars(
        &schema,
        Some(Role::Commander),
        r#"mutation Relink($eventId: Int!, $ids: [Int!]!) {
            addAmbulancesToEvent(eventId: $eventId, ambulanceIds: $ids) { id }
        }"#,
        json!({ "eventId": event_id, "ids": [ambulance_id] }),
    )
    .await;
    assert_eq!(response["errors"], Value::Null, "{response}");
    assert_eq!(event_ambulance_ids(&schema, event_id).await, vec![ambulance_id]);
}

#[tokio::test]
async fn unknown_creator_yields_not_found_extension() {
    let schema = schema();

    let response = execute(
        &schema,
        Some(Role::Commander),
        r#"mutation {
            addEvent(
                name: "Ghost", eventDate: "2026-06-01T09:00:00Z",
                createdBy: 404, isActive: true
            ) { id }
        }"#,
    )
    .await;

    assert_eq!(response["errors"][0]["message"], "user not found: 404");
    assert_eq!(response["errors"][0]["extensions"]["code"], "NOT_FOUND");
    assert_eq!(response["errors"][0]["extensions"]["category"], "not_found");
}

#[tokio::test]
async fn ambulance_queries_are_role_gated() {
    let schema = schema();

    let response = execute(&schema, None, "query { ambulances { id } }").await;
    assert_eq!(response["errors"][0]["extensions"]["code"], "UNAUTHORIZED");

    // A supervisor is outside the ambulance read allow-list.
    let response = execute(&schema, Some(Role::Supervisor), "query { ambulances { id } }").await;
    assert_eq!(response["errors"][0]["extensions"]["code"], "UNAUTHORIZED");

    let response = execute(&schema, Some(Role::Commander), "query { ambulances { id } }").await;
    assert_eq!(response["errors"], Value::Null, "{response}");
    assert_eq!(response["data"]["ambulances"], json!([]));
}

#[tokio::test]
async fn update_patient_distinguishes_null_from_omitted() {
    let schema = schema();
    let (user_id, event_id) = seed_user_and_event(&schema).await;

    let response = execute_with_vars(
        &schema,
        Some(Role::Supervisor),
        r#"mutation Ccp($eventId: Int!, $createdBy: Int!) {
            addCollectionPoint(name: "Checkpoint 1", eventId: $eventId, createdBy: $createdBy) { id }
        }"#,
        json!({ "eventId": event_id, "createdBy": user_id }),
    )
    .await;
    assert_eq!(response["errors"], Value::Null, "{response}");
    let ccp_id = response["data"]["addCollectionPoint"]["id"].as_i64().unwrap();

    let response = execute(
        &schema,
        Some(Role::Commander),
        r#"mutation { addHospital(name: "General") { id } }"#,
    )
    .await;
    assert_eq!(response["errors"], Value::Null, "{response}");
    let hospital_id = response["data"]["addHospital"]["id"].as_i64().unwrap();

    let response = execute_with_vars(
        &schema,
        Some(Role::Supervisor),
        r#"mutation AddPatient($ccp: Int!, $hospital: Int) {
            addPatient(
                gender: FEMALE, age: 29, runNumber: 3, barcodeValue: "CP-0003",
                status: ON_SITE, triageCategory: RED, triageLevel: 1,
                collectionPointId: $ccp, hospitalId: $hospital
            ) { id hospital { id } }
        }"#,
        json!({ "ccp": ccp_id, "hospital": hospital_id }),
    )
    .await;
    assert_eq!(response["errors"], Value::Null, "{response}");
    let patient_id = response["data"]["addPatient"]["id"].as_i64().unwrap();

    // Omitting hospitalId leaves the association in place.
    let response = execute_with_vars(
        &schema,
        Some(Role::Supervisor),
        r#"mutation Update($id: Int!) {
            updatePatient(id: $id, age: 30) { age hospital { id } }
        }"#,
        json!({ "id": patient_id }),
    )
    .await;
    assert_eq!(response["errors"], Value::Null, "{response}");
    assert_eq!(response["data"]["updatePatient"]["age"], 30);
    assert_eq!(
        response["data"]["updatePatient"]["hospital"]["id"],
        hospital_id
    );

    // An explicit null clears it.
    let response = execute_with_vars(
        &schema,
        Some(Role::Supervisor),
        r#"mutation Clear($id: Int!) {
            updatePatient(id: $id, hospitalId: null) { hospital { id } }
        }"#,
        json!({ "id": patient_id }),
    )
    .await;
    assert_eq!(response["errors"], Value::Null, "{response}");
    assert_eq!(response["data"]["updatePatient"]["hospital"], Value::Null);
}

#[tokio::test]
async fn delete_patient_flips_status_only() {
    let schema = schema();
    let (user_id, event_id) = seed_user_and_event(&schema).await;

    let response = execute_with_vars(
        &schema,
        Some(Role::Supervisor),
        r#"mutation Ccp($eventId: Int!, $createdBy: Int!) {
            addCollectionPoint(name: "Checkpoint 1", eventId: $eventId, createdBy: $createdBy) { id }
        }"#,
        json!({ "eventId": event_id, "createdBy": user_id }),
    )
    .await;
    let ccp_id = response["data"]["addCollectionPoint"]["id"].as_i64().unwrap();

    let response = execute_with_vars(
        &schema,
        Some(Role::Supervisor),
        r#"mutation AddPatient($ccp: Int!) {
            addPatient(
                gender: MALE, age: 52, runNumber: 4, barcodeValue: "CP-0004",
                status: ON_SITE, triageCategory: GREEN, triageLevel: 3,
                collectionPointId: $ccp
            ) { id }
        }"#,
        json!({ "ccp": ccp_id }),
    )
    .await;
    let patient_id = response["data"]["addPatient"]["id"].as_i64().unwrap();

    let response = execute_with_vars(
        &schema,
        Some(Role::Supervisor),
        r#"mutation Delete($id: Int!) { deletePatient(id: $id) }"#,
        json!({ "id": patient_id }),
    )
    .await;
    assert_eq!(response["errors"], Value::Null, "{response}");
    assert_eq!(response["data"]["deletePatient"], true);

    // The row is still queryable; only the status changed.
    let response = execute_with_vars(
        &schema,
        None,
        r#"query Patient($id: Int!) { patient(id: $id) { status } }"#,
        json!({ "id": patient_id }),
    )
    .await;
    assert_eq!(response["data"]["patient"]["status"], "DELETED");

    // Deleting a missing patient is a DELETION_FAILED error.
    let response = execute_with_vars(
        &schema,
        Some(Role::Supervisor),
        r#"mutation Delete($id: Int!) { deletePatient(id: $id) }"#,
        json!({ "id": 404 }),
    )
    .await;
    assert_eq!(
        response["errors"][0]["extensions"]["code"],
        "DELETION_FAILED"
    );
}

#[tokio::test]
async fn user_management_is_admin_gated() {
    let schema = schema();
    let (user_id, event_id) = seed_user_and_event(&schema).await;

    let delete = r#"mutation Delete($id: Int!) { deleteUser(id: $id) }"#;

    let response = execute_with_vars(
        &schema,
        Some(Role::Commander),
        delete,
        json!({ "id": user_id }),
    )
    .await;
    assert_eq!(response["errors"][0]["extensions"]["code"], "UNAUTHORIZED");

    let response =
        execute_with_vars(&schema, Some(Role::Admin), delete, json!({ "id": user_id })).await;
    assert_eq!(response["errors"], Value::Null, "{response}");
    assert_eq!(response["data"]["deleteUser"], 1);

    // The event still resolves its creator across the tombstone.
    let response = execute_with_vars(
        &schema,
        None,
        r#"query Event($id: Int!) { event(id: $id) { createdBy { id } } }"#,
        json!({ "id": event_id }),
    )
    .await;
    assert_eq!(response["errors"], Value::Null, "{response}");
    assert_eq!(response["data"]["event"]["createdBy"]["id"], user_id);

    let response = execute_with_vars(
        &schema,
        Some(Role::Admin),
        r#"mutation Restore($id: Int!) { restoreUser(id: $id) { id email } }"#,
        json!({ "id": user_id }),
    )
    .await;
    assert_eq!(response["errors"], Value::Null, "{response}");
    assert_eq!(response["data"]["restoreUser"]["id"], user_id);
}

#[tokio::test]
async fn delete_ambulance_with_patients_is_a_conflict() {
    let schema = schema();
    let (user_id, event_id) = seed_user_and_event(&schema).await;
    let ambulance_id = seed_ambulance(&schema, "A-9").await;

    let response = execute_with_vars(
        &schema,
        Some(Role::Supervisor),
        r#"mutation Ccp($eventId: Int!, $createdBy: Int!) {
            addCollectionPoint(name: "Checkpoint 1", eventId: $eventId, createdBy: $createdBy) { id }
        }"#,
        json!({ "eventId": event_id, "createdBy": user_id }),
    )
    .await;
    let ccp_id = response["data"]["addCollectionPoint"]["id"].as_i64().unwrap();

    let response = execute_with_vars(
        &schema,
        Some(Role::Supervisor),
        r#"mutation AddPatient($ccp: Int!, $ambulance: Int) {
            addPatient(
                gender: OTHER, age: 18, runNumber: 5, barcodeValue: "CP-0005",
                status: TRANSPORTED, triageCategory: YELLOW, triageLevel: 2,
                collectionPointId: $ccp, ambulanceId: $ambulance
            ) { id }
        }"#,
        json!({ "ccp": ccp_id, "ambulance": ambulance_id }),
    )
    .await;
    assert_eq!(response["errors"], Value::Null, "{response}");

    let response = execute_with_vars(
        &schema,
        Some(Role::Admin),
        r#"mutation Delete($id: Int!) { deleteAmbulance(id: $id) }"#,
        json!({ "id": ambulance_id }),
    )
    .await;
    assert_eq!(response["errors"][0]["extensions"]["code"], "CONFLICT");
}
