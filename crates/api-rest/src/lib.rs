//! # API REST
//!
//! REST API for the ambulance appointments service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - The JSON error envelope and status code mapping
//! - OpenAPI document generation
//! - REST-specific middleware (CORS, request tracing)
//!
//! Stores are injected once through [`AppState`]; handlers never look dependencies up at
//! request time.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod handlers;

use ambulance_core::{
    Appointment, AppointmentUpdate, DocumentStore, Location, LocationRef, LocationRefUpdate,
    PersonRef, PersonRefUpdate, User, UserRole,
};
use axum::{
    http::{header, Method},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub use error::{ApiError, ErrorBody};
use handlers::{appointments, health, locations, users};

/// How long browsers may cache a preflight response.
const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

/// Application state shared across REST API handlers.
///
/// Holds one store per entity kind. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub appointments: Arc<dyn DocumentStore<Appointment>>,
    pub users: Arc<dyn DocumentStore<User>>,
    pub locations: Arc<dyn DocumentStore<Location>>,
}

impl AppState {
    pub fn new(
        appointments: Arc<dyn DocumentStore<Appointment>>,
        users: Arc<dyn DocumentStore<User>>,
        locations: Arc<dyn DocumentStore<Location>>,
    ) -> Self {
        Self {
            appointments,
            users,
            locations,
        }
    }

    /// Release every store. Called once after the server has stopped.
    pub async fn disconnect(&self) {
        self.appointments.disconnect().await;
        self.users.disconnect().await;
        self.locations.disconnect().await;
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        appointments::create_appointment,
        appointments::list_appointments,
        appointments::get_appointment,
        appointments::update_appointment,
        appointments::delete_appointment,
        users::list_users,
        users::get_user,
        locations::list_locations,
    ),
    components(schemas(
        health::HealthRes,
        ErrorBody,
        Appointment,
        AppointmentUpdate,
        PersonRef,
        PersonRefUpdate,
        LocationRef,
        LocationRefUpdate,
        User,
        UserRole,
        Location,
    )),
    tags(
        (name = "appointments", description = "Ambulance appointment booking"),
        (name = "users", description = "Patients and doctors"),
        (name = "locations", description = "Rooms appointments take place in"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

async fn openapi_document() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// CORS policy: any origin, no credentials, the methods and headers the front end uses.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([header::ORIGIN, header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(CORS_MAX_AGE)
}

/// Build the full router with middleware, bound to `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/openapi", get(openapi_document))
        .route(
            "/appointments",
            get(appointments::list_appointments).post(appointments::create_appointment),
        )
        .route(
            "/appointments/:appointment_id",
            get(appointments::get_appointment)
                .put(appointments::update_appointment)
                .delete(appointments::delete_appointment),
        )
        .route("/users", get(users::list_users))
        .route("/users/:user_id", get(users::get_user))
        .route("/locations", get(locations::list_locations))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}
