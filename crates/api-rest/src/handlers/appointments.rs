//! Appointment endpoints.
//!
//! Single-record failures from the store surface as `502 Bad Gateway`; listing failures as
//! `500 Internal Server Error`.

use super::{first_query_value, QueryPairs};
use crate::error::{invalid_body, require_id, ApiError};
use crate::AppState;
use ambulance_core::{find_all, Appointment, AppointmentFilter, AppointmentUpdate, StoreError};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

const ID_REQUIRED: &str = "Appointment ID is required";

/// Query parameters accepted by [`list_appointments`].
///
/// A repeated parameter keeps its first value.
#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AppointmentQuery {
    /// Keep appointments this user takes part in.
    pub user_id: Option<String>,
    /// `patient` or `creator`: match the user only in that position.
    pub role: Option<String>,
}

impl AppointmentQuery {
    fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            user_id: first_query_value(pairs, "userId"),
            role: first_query_value(pairs, "role"),
        }
    }
}

fn lookup_error(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound => {
            tracing::debug!("appointment not found");
            ApiError::not_found("Appointment not found", err)
        }
        err => {
            tracing::error!("Get appointment error: {:?}", err);
            ApiError::bad_gateway("Failed to get appointment from database", err)
        }
    }
}

#[utoipa::path(
    post,
    path = "/appointments",
    tag = "appointments",
    request_body = Appointment,
    responses(
        (status = 201, description = "Appointment created", body = Appointment),
        (status = 400, description = "Invalid request body", body = crate::error::ErrorBody),
        (status = 409, description = "Appointment already exists", body = crate::error::ErrorBody),
        (status = 502, description = "Database failure", body = crate::error::ErrorBody)
    )
)]
/// Create an appointment.
///
/// An appointment without an `id` is assigned a fresh UUID before it is stored.
#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<AppState>,
    payload: Result<Json<Appointment>, JsonRejection>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let Json(mut appointment) = payload.map_err(invalid_body)?;
    let id = appointment.ensure_id().to_string();

    match state.appointments.create_document(&id, &appointment).await {
        Ok(()) => {
            tracing::info!(id = %id, "appointment created");
            Ok((StatusCode::CREATED, Json(appointment)))
        }
        Err(err @ StoreError::Conflict) => {
            Err(ApiError::conflict("Appointment already exists", err))
        }
        Err(err) => {
            tracing::error!("Create appointment error: {:?}", err);
            Err(ApiError::bad_gateway(
                "Failed to create appointment in database",
                err,
            ))
        }
    }
}

#[utoipa::path(
    get,
    path = "/appointments",
    tag = "appointments",
    params(AppointmentQuery),
    responses(
        (status = 200, description = "Matching appointments", body = [Appointment]),
        (status = 500, description = "Listing or decoding failed", body = crate::error::ErrorBody)
    )
)]
/// List appointments, optionally narrowed by `userId` and `role`.
///
/// See [`AppointmentFilter`] for how the two parameters interact. Any record that fails to
/// decode aborts the whole listing.
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let query = AppointmentQuery::from_pairs(&pairs);
    let appointments = find_all(state.appointments.as_ref())
        .await
        .map_err(|err| {
            tracing::error!("List appointments error: {:?}", err);
            match err {
                StoreError::Decode(_) => ApiError::internal("failed to decode appointment", err),
                err => ApiError::internal("failed to get appointments", err),
            }
        })?;

    let filter = AppointmentFilter::new(query.user_id, query.role);
    Ok(Json(filter.apply(appointments)))
}

#[utoipa::path(
    get,
    path = "/appointments/{appointmentId}",
    tag = "appointments",
    params(("appointmentId" = String, Path, description = "Appointment identifier")),
    responses(
        (status = 200, description = "Appointment found", body = Appointment),
        (status = 400, description = "Missing identifier", body = crate::error::ErrorBody),
        (status = 404, description = "Appointment not found", body = crate::error::ErrorBody),
        (status = 502, description = "Database failure", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    require_id(&appointment_id, ID_REQUIRED)?;

    let appointment = state
        .appointments
        .find_document(&appointment_id)
        .await
        .map_err(lookup_error)?;
    Ok(Json(appointment))
}

#[utoipa::path(
    put,
    path = "/appointments/{appointmentId}",
    tag = "appointments",
    params(("appointmentId" = String, Path, description = "Appointment identifier")),
    request_body = AppointmentUpdate,
    responses(
        (status = 200, description = "Merged appointment", body = Appointment),
        (status = 400, description = "Missing identifier or invalid body", body = crate::error::ErrorBody),
        (status = 404, description = "Appointment not found", body = crate::error::ErrorBody),
        (status = 502, description = "Database failure", body = crate::error::ErrorBody)
    )
)]
/// Partially update an appointment.
///
/// The stored record is fetched first, so an unknown id answers 404 even when the body is
/// malformed. Supplied non-empty fields are merged onto it (see
/// [`Appointment::apply_update`]) and the result replaces the record stored under the path id.
#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<String>,
    payload: Result<Json<AppointmentUpdate>, JsonRejection>,
) -> Result<Json<Appointment>, ApiError> {
    require_id(&appointment_id, ID_REQUIRED)?;

    let mut appointment = state
        .appointments
        .find_document(&appointment_id)
        .await
        .map_err(lookup_error)?;

    let Json(update) = payload.map_err(invalid_body)?;
    appointment.apply_update(update);

    state
        .appointments
        .update_document(&appointment_id, &appointment)
        .await
        .map_err(|err| {
            tracing::error!("Update appointment error: {:?}", err);
            ApiError::bad_gateway("Failed to update appointment in database", err)
        })?;

    tracing::info!(id = %appointment_id, "appointment updated");
    Ok(Json(appointment))
}

#[utoipa::path(
    delete,
    path = "/appointments/{appointmentId}",
    tag = "appointments",
    params(("appointmentId" = String, Path, description = "Appointment identifier")),
    responses(
        (status = 204, description = "Appointment deleted"),
        (status = 400, description = "Missing identifier", body = crate::error::ErrorBody),
        (status = 404, description = "Appointment not found", body = crate::error::ErrorBody),
        (status = 502, description = "Database failure", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_id(&appointment_id, ID_REQUIRED)?;

    match state.appointments.delete_document(&appointment_id).await {
        Ok(()) => {
            tracing::info!(id = %appointment_id, "appointment deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(err @ StoreError::NotFound) => {
            tracing::debug!(id = %appointment_id, "appointment to delete not found");
            Err(ApiError::not_found("Appointment not found", err))
        }
        Err(err) => {
            tracing::error!("Delete appointment error: {:?}", err);
            Err(ApiError::bad_gateway(
                "Failed to delete appointment from database",
                err,
            ))
        }
    }
}
