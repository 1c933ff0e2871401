//! Availability API endpoints
//!
//! - POST /api/availability - Replace a mentor's time slots
//! - GET /api/availability/{email} - Read a mentor's time slots

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::models::TimeSlot;

/// Request body for replacing availability
#[derive(Debug, Deserialize)]
pub struct SetAvailabilityRequest {
    pub email: String,
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
}

/// Response carrying a mentor's slots
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub time_slots: Vec<TimeSlot>,
}

/// Build the availability router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/availability", post(set_availability))
        .route("/availability/{email}", get(get_availability))
}

/// POST /api/availability - Replace the mentor's slots wholesale
async fn set_availability(
    State(state): State<AppState>,
    Json(body): Json<SetAvailabilityRequest>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    if body.email.is_empty() {
        return Err(ApiError::validation_error("Email is required"));
    }
    state
        .availability
        .set_slots(&body.email, body.time_slots)
        .await?;
    let time_slots = state.availability.get_slots(&body.email).await?;
    Ok(Json(AvailabilityResponse { time_slots }))
}

/// GET /api/availability/{email} - Read the mentor's current slots
///
/// A mentor with no stored record answers with an empty list.
async fn get_availability(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let time_slots = state.availability.get_slots(&email).await?;
    Ok(Json(AvailabilityResponse { time_slots }))
}
