use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use musafir_booking::{Booking, BookingPatch, CreateBookingRequest};
use musafir_core::{AuthenticatedUser, BookingError};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create_booking))
        .route("/bookings/my-bookings", get(my_bookings))
        .route("/bookings/{id}", get(get_booking).patch(update_booking))
        .route("/bookings/{id}/cancel", post(cancel_booking))
        .layer(axum::middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let booking = state.manager.create_booking(request, &user).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state.manager.get_booking(id, &user).await?;
    Ok(Json(booking))
}

async fn my_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = state.manager.list_bookings(&user).await?;
    Ok(Json(bookings))
}

async fn update_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<Booking>, ApiError> {
    // Enforce the allow-list at the boundary: any field outside it is an
    // invalid update, not a silent no-op.
    let allowed = ["special_requests"];
    let fields = patch
        .as_object()
        .ok_or(ApiError(BookingError::InvalidUpdate))?;
    if !fields.keys().all(|key| allowed.contains(&key.as_str())) {
        return Err(ApiError(BookingError::InvalidUpdate));
    }

    let patch: BookingPatch =
        serde_json::from_value(patch).map_err(|_| ApiError(BookingError::InvalidUpdate))?;

    let booking = state.manager.update_booking(id, &user, patch).await?;
    Ok(Json(booking))
}

#[derive(Debug, Deserialize, Default)]
struct CancelBookingRequest {
    #[serde(default)]
    reason: Option<String>,
}

async fn cancel_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<CancelBookingRequest>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state.manager.cancel_booking(id, &user, request.reason).await?;
    Ok(Json(booking))
}
