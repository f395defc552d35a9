//! Shared fixtures for the REST integration tests.

#![allow(dead_code)]

use ambulance_core::{
    Appointment, Document, DocumentStore, DocumentStream, InMemoryStore, Location, StoreError,
    StoreResult, User,
};
use api_rest::AppState;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tower::ServiceExt;

/// In-memory stores behind a router, kept around so tests can seed and inspect them.
pub struct TestApp {
    pub appointments: InMemoryStore<Appointment>,
    pub users: InMemoryStore<User>,
    pub locations: InMemoryStore<Location>,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            appointments: InMemoryStore::new(),
            users: InMemoryStore::new(),
            locations: InMemoryStore::new(),
        }
    }

    pub fn router(&self) -> Router {
        api_rest::router(AppState::new(
            Arc::new(self.appointments.clone()),
            Arc::new(self.users.clone()),
            Arc::new(self.locations.clone()),
        ))
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, JsonValue) {
        send(self.router(), request).await
    }
}

/// Store whose every operation fails with a backend error.
pub struct FailingStore;

fn backend_down() -> StoreError {
    StoreError::Backend(std::io::Error::other("connection refused").into())
}

#[async_trait]
impl<T: Document> DocumentStore<T> for FailingStore {
    async fn create_document(&self, _id: &str, _document: &T) -> StoreResult<()> {
        Err(backend_down())
    }

    async fn find_document(&self, _id: &str) -> StoreResult<T> {
        Err(backend_down())
    }

    async fn find_all_documents(&self) -> StoreResult<DocumentStream<T>> {
        Err(backend_down())
    }

    async fn update_document(&self, _id: &str, _document: &T) -> StoreResult<()> {
        Err(backend_down())
    }

    async fn delete_document(&self, _id: &str) -> StoreResult<()> {
        Err(backend_down())
    }

    async fn disconnect(&self) {}
}

pub fn failing_router() -> Router {
    api_rest::router(AppState::new(
        Arc::new(FailingStore),
        Arc::new(FailingStore),
        Arc::new(FailingStore),
    ))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(Method::GET)
        .body(Body::empty())
        .unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(Method::DELETE)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, JsonValue) {
    let response = app.oneshot(request).await.unwrap();
    read_json(response).await
}

/// Status plus parsed JSON body; an empty body reads as `null`.
pub async fn read_json(response: Response<Body>) -> (StatusCode, JsonValue) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn appointment_json(id: &str, patient: &str, doctor: &str, creator: &str) -> JsonValue {
    serde_json::json!({
        "id": id,
        "dateTime": "2025-03-01T09:30:00Z",
        "patient": {"id": patient, "name": format!("Patient {patient}"), "role": "patient"},
        "doctor": {"id": doctor, "name": format!("Doctor {doctor}"), "role": "doctor"},
        "location": {"id": "loc1", "name": "Room 101", "address": "Main Building, Floor 1"},
        "createdBy": {"id": creator, "name": format!("Creator {creator}"), "role": "doctor"}
    })
}

pub fn appointment(id: &str, patient: &str, doctor: &str, creator: &str) -> Appointment {
    serde_json::from_value(appointment_json(id, patient, doctor, creator)).unwrap()
}

pub fn ids(body: &JsonValue) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}
