//! End-to-end tests for the appointment endpoints, driven through `tower::ServiceExt::oneshot`.

mod common;

use ambulance_core::DocumentStore;
use axum::http::{Method, StatusCode};
use common::{appointment, appointment_json, delete, get, ids, json_request, TestApp};
use serde_json::json;

async fn seeded_app() -> TestApp {
    let app = TestApp::new();
    for record in [
        appointment("A", "u1", "d9", "c9"),
        appointment("B", "p9", "u1", "c9"),
        appointment("C", "p9", "d9", "u1"),
        appointment("D", "u2", "d9", "c9"),
    ] {
        app.appointments
            .create_document(&record.id.clone(), &record)
            .await
            .unwrap();
    }
    app
}

// ===== Create =====

#[tokio::test]
async fn test_create_without_id_assigns_one() {
    let app = TestApp::new();
    let mut body = appointment_json("", "u1", "d1", "u1");
    body.as_object_mut().unwrap().remove("id");

    let (status, created) = app
        .send(json_request(Method::POST, "/appointments", body.to_string()))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap();
    assert!(!id.is_empty());
    assert_eq!(created["patient"]["id"], "u1");
    assert_eq!(created["dateTime"], "2025-03-01T09:30:00Z");

    let (status, fetched) = app.send(get(&format!("/appointments/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_twice_without_id_yields_distinct_ids() {
    let app = TestApp::new();
    let body = appointment_json("", "u1", "d1", "u1").to_string();

    let (_, first) = app
        .send(json_request(Method::POST, "/appointments", body.clone()))
        .await;
    let (_, second) = app
        .send(json_request(Method::POST, "/appointments", body))
        .await;

    assert_ne!(first["id"], second["id"]);
    assert_eq!(app.appointments.len().await, 2);
}

#[tokio::test]
async fn test_create_keeps_supplied_id() {
    let app = TestApp::new();

    let (status, created) = app
        .send(json_request(
            Method::POST,
            "/appointments",
            appointment_json("appt-42", "u1", "d1", "u1").to_string(),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], "appt-42");
}

#[tokio::test]
async fn test_create_duplicate_id_conflicts() {
    let app = seeded_app().await;

    let (status, body) = app
        .send(json_request(
            Method::POST,
            "/appointments",
            appointment_json("A", "u5", "d5", "u5").to_string(),
        ))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "Conflict");
    assert_eq!(body["message"], "Appointment already exists");
    assert_eq!(app.appointments.len().await, 4);
}

#[tokio::test]
async fn test_create_with_malformed_body_is_bad_request() {
    let app = TestApp::new();

    let (status, body) = app
        .send(json_request(Method::POST, "/appointments", "invalid json{"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "Bad Request");
    assert_eq!(body["message"], "Invalid request body");
    assert!(app.appointments.is_empty().await);
}

#[tokio::test]
async fn test_create_with_wrongly_typed_field_is_bad_request() {
    let app = TestApp::new();

    let (status, _) = app
        .send(json_request(
            Method::POST,
            "/appointments",
            json!({"dateTime": 12, "patient": "u1"}).to_string(),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ===== Get / Delete =====

#[tokio::test]
async fn test_get_unknown_appointment_is_not_found() {
    let app = seeded_app().await;

    let (status, body) = app.send(get("/appointments/missing")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "Not Found");
    assert_eq!(body["message"], "Appointment not found");
    assert_eq!(body["error"], "document not found");
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let app = seeded_app().await;

    let (status, body) = app.send(delete("/appointments/B")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app.send(get("/appointments/B")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(delete("/appointments/B")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.appointments.len().await, 3);
}

// ===== Update =====

#[tokio::test]
async fn test_update_merges_only_supplied_fields() {
    let app = seeded_app().await;

    let (status, merged) = app
        .send(json_request(
            Method::PUT,
            "/appointments/A",
            json!({
                "dateTime": "2025-04-02T14:00:00Z",
                "doctor": {"name": "Dr. Sarah Wilson", "role": ""},
                "location": {"id": "loc2"}
            })
            .to_string(),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(merged["id"], "A");
    assert_eq!(merged["dateTime"], "2025-04-02T14:00:00Z");
    assert_eq!(merged["doctor"]["id"], "d9");
    assert_eq!(merged["doctor"]["name"], "Dr. Sarah Wilson");
    assert_eq!(merged["doctor"]["role"], "doctor");
    assert_eq!(merged["location"]["id"], "loc2");
    assert_eq!(merged["location"]["name"], "Room 101");
    assert_eq!(merged["patient"]["id"], "u1");

    let (_, stored) = app.send(get("/appointments/A")).await;
    assert_eq!(stored, merged);
}

#[tokio::test]
async fn test_update_with_empty_body_object_changes_nothing() {
    let app = seeded_app().await;
    let (_, before) = app.send(get("/appointments/C")).await;

    let (status, after) = app
        .send(json_request(Method::PUT, "/appointments/C", "{}"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_update_unknown_appointment_is_not_found_even_with_bad_body() {
    let app = seeded_app().await;

    let (status, _) = app
        .send(json_request(Method::PUT, "/appointments/missing", "not json"))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.appointments.write_count(), 4);
}

#[tokio::test]
async fn test_update_existing_appointment_with_bad_body_is_bad_request() {
    let app = seeded_app().await;

    let (status, body) = app
        .send(json_request(Method::PUT, "/appointments/A", "not json"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid request body");
    assert_eq!(app.appointments.write_count(), 4);
}

#[tokio::test]
async fn test_update_with_zero_date_time_keeps_stored_time() {
    let app = seeded_app().await;

    let (status, merged) = app
        .send(json_request(
            Method::PUT,
            "/appointments/A",
            json!({"dateTime": "0001-01-01T00:00:00Z"}).to_string(),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(merged["dateTime"], "2025-03-01T09:30:00Z");

    let (_, stored) = app.send(get("/appointments/A")).await;
    assert_eq!(stored["dateTime"], "2025-03-01T09:30:00Z");
}

#[tokio::test]
async fn test_update_onto_existing_id_is_rejected_and_keeps_ids_unique() {
    let app = seeded_app().await;

    let (status, body) = app
        .send(json_request(
            Method::PUT,
            "/appointments/A",
            json!({"id": "B"}).to_string(),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Failed to update appointment in database");

    let (_, listed) = app.send(get("/appointments")).await;
    assert_eq!(ids(&listed), vec!["A", "B", "C", "D"]);
}

// ===== List / Filter =====

#[tokio::test]
async fn test_list_without_parameters_returns_all_in_order() {
    let app = seeded_app().await;

    let (status, body) = app.send(get("/appointments")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["A", "B", "C", "D"]);
}

#[tokio::test]
async fn test_list_empty_store_returns_empty_array() {
    let app = TestApp::new();

    let (status, body) = app.send(get("/appointments")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_list_by_user_matches_any_participant() {
    let app = seeded_app().await;

    let (_, body) = app.send(get("/appointments?userId=u1")).await;

    assert_eq!(ids(&body), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_list_by_user_and_role_pins_the_position() {
    let app = seeded_app().await;

    let (_, patient) = app.send(get("/appointments?userId=u1&role=patient")).await;
    let (_, creator) = app.send(get("/appointments?userId=u1&role=creator")).await;
    let (_, doctor) = app.send(get("/appointments?userId=u1&role=doctor")).await;

    assert_eq!(ids(&patient), vec!["A"]);
    assert_eq!(ids(&creator), vec!["C"]);
    assert!(ids(&doctor).is_empty());
}

#[tokio::test]
async fn test_list_with_empty_parameters_returns_all() {
    let app = seeded_app().await;

    let (_, body) = app.send(get("/appointments?userId=&role=")).await;

    assert_eq!(ids(&body), vec!["A", "B", "C", "D"]);
}

#[tokio::test]
async fn test_list_with_repeated_parameters_uses_first_value() {
    let app = seeded_app().await;

    let (status, body) = app
        .send(get("/appointments?userId=u2&userId=u1&role=patient&role=creator"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["D"]);
}

#[tokio::test]
async fn test_list_with_undecodable_record_is_internal_error() {
    let app = seeded_app().await;
    app.appointments
        .insert_raw("broken", json!({"id": "broken", "dateTime": "yesterday"}))
        .await;

    let (status, body) = app.send(get("/appointments")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "failed to decode appointment");
}

// ===== Store failures =====

#[tokio::test]
async fn test_single_record_store_failures_are_bad_gateway() {
    let requests = [
        json_request(
            Method::POST,
            "/appointments",
            appointment_json("A", "u1", "d1", "u1").to_string(),
        ),
        get("/appointments/A"),
        json_request(Method::PUT, "/appointments/A", "{}"),
        delete("/appointments/A"),
    ];

    for request in requests {
        let (status, body) = common::send(common::failing_router(), request).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["status"], "Bad Gateway");
    }
}

#[tokio::test]
async fn test_list_store_failure_is_internal_error() {
    let (status, body) = common::send(common::failing_router(), get("/appointments")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "failed to get appointments");
}
