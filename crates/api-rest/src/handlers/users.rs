//! User endpoints. Store failures here surface as `500 Internal Server Error`.

use super::{first_query_value, QueryPairs};
use crate::error::{require_id, ApiError};
use crate::AppState;
use ambulance_core::{find_all, users::filter_by_role, StoreError, User};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

/// A repeated `role` keeps its first value.
#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// Exact role to keep, e.g. `doctor`.
    pub role: Option<String>,
}

impl UserQuery {
    fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            role: first_query_value(pairs, "role"),
        }
    }
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(UserQuery),
    responses(
        (status = 200, description = "Users, optionally filtered by role", body = [User]),
        (status = 500, description = "Listing or decoding failed", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<Vec<User>>, ApiError> {
    let query = UserQuery::from_pairs(&pairs);
    let users = find_all(state.users.as_ref()).await.map_err(|err| {
        tracing::error!("List users error: {:?}", err);
        match err {
            StoreError::Decode(_) => ApiError::internal("failed to decode user", err),
            err => ApiError::internal("failed to get users", err),
        }
    })?;

    Ok(Json(filter_by_role(users, query.role.as_deref())))
}

#[utoipa::path(
    get,
    path = "/users/{userId}",
    tag = "users",
    params(("userId" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, description = "Missing identifier", body = crate::error::ErrorBody),
        (status = 404, description = "User not found", body = crate::error::ErrorBody),
        (status = 500, description = "Database failure", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    require_id(&user_id, "user id is required")?;

    match state.users.find_document(&user_id).await {
        Ok(user) => Ok(Json(user)),
        Err(err @ StoreError::NotFound) => {
            tracing::debug!(id = %user_id, "user not found");
            Err(ApiError::not_found(
                format!("user with id {user_id} not found"),
                err,
            ))
        }
        Err(err) => {
            tracing::error!("Get user error: {:?}", err);
            Err(ApiError::internal("failed to get user", err))
        }
    }
}
