use crate::error::ApiError;
use crate::AppState;
use ambulance_core::{find_all, Location, StoreError};
use axum::{extract::State, Json};

#[utoipa::path(
    get,
    path = "/locations",
    tag = "locations",
    responses(
        (status = 200, description = "All locations", body = [Location]),
        (status = 500, description = "Listing or decoding failed", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn list_locations(State(state): State<AppState>) -> Result<Json<Vec<Location>>, ApiError> {
    let locations = find_all(state.locations.as_ref()).await.map_err(|err| {
        tracing::error!("List locations error: {:?}", err);
        match err {
            StoreError::Decode(_) => ApiError::internal("failed to decode location", err),
            err => ApiError::internal("failed to get locations", err),
        }
    })?;

    Ok(Json(locations))
}
