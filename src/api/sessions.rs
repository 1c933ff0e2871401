//! Session workflow API endpoints
//!
//! - POST /api/session-request - File an unscheduled request
//! - POST /api/session-request-scheduled - File a request with a date/time
//! - GET /api/sessions/{email} - All sessions for either party
//! - PUT /api/session-status - Accept or decline a request
//! - GET /api/upcoming-sessions/{email} - Accepted, future-dated sessions

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::api::middleware::{ApiError, AppState};
use crate::models::{CreateSessionRequestInput, SessionRequest, SessionStatus, UpcomingSession};

/// Request body for filing a session request
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequestBody {
    pub mentee_email: String,
    pub mentor_email: String,
    pub subject: String,
    #[serde(default)]
    pub message: String,
    pub scheduled_date: Option<String>,
    pub scheduled_time: Option<String>,
}

/// Request body for a status transition
#[derive(Debug, Deserialize)]
pub struct UpdateSessionStatusRequest {
    pub session_id: i64,
    pub status: String,
}

/// Response for a session list
#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionRequest>,
}

/// Response for the upcoming-session list
#[derive(Debug, Serialize)]
pub struct UpcomingSessionsResponse {
    pub sessions: Vec<UpcomingSession>,
}

/// Build the sessions router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session-request", post(create_session_request))
        .route("/session-request-scheduled", post(create_scheduled_session_request))
        .route("/sessions/{email}", get(list_sessions))
        .route("/session-status", put(update_session_status))
        .route("/upcoming-sessions/{email}", get(list_upcoming_sessions))
}

impl CreateSessionRequestBody {
    fn into_input(self) -> CreateSessionRequestInput {
        CreateSessionRequestInput {
            mentee_email: self.mentee_email,
            mentor_email: self.mentor_email,
            subject: self.subject,
            message: self.message,
            scheduled_date: self.scheduled_date,
            scheduled_time: self.scheduled_time,
        }
    }
}

/// POST /api/session-request - File an unscheduled session request
async fn create_session_request(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequestBody>,
) -> Result<Json<SessionRequest>, ApiError> {
    let request = state.sessions.create_request(body.into_input()).await?;
    Ok(Json(request))
}

/// POST /api/session-request-scheduled - File a request with a proposed slot
///
/// Unlike the unscheduled variant, the date and time are mandatory here.
async fn create_scheduled_session_request(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequestBody>,
) -> Result<Json<SessionRequest>, ApiError> {
    if body.scheduled_date.is_none() || body.scheduled_time.is_none() {
        return Err(ApiError::validation_error(
            "scheduled_date and scheduled_time are required",
        ));
    }
    let request = state.sessions.create_request(body.into_input()).await?;
    Ok(Json(request))
}

/// GET /api/sessions/{email} - All sessions where the email is either party
async fn list_sessions(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<SessionListResponse>, ApiError> {
    let sessions = state.sessions.list_for_user(&email).await?;
    Ok(Json(SessionListResponse { sessions }))
}

/// PUT /api/session-status - Accept or decline a session request
async fn update_session_status(
    State(state): State<AppState>,
    Json(body): Json<UpdateSessionStatusRequest>,
) -> Result<Json<SessionRequest>, ApiError> {
    let status = SessionStatus::from_str(&body.status)
        .map_err(|_| ApiError::validation_error(format!("Invalid status: {}", body.status)))?;
    let session = state
        .sessions
        .transition_status(body.session_id, status)
        .await?;
    Ok(Json(session))
}

/// GET /api/upcoming-sessions/{email} - Accepted sessions from today onward
async fn list_upcoming_sessions(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UpcomingSessionsResponse>, ApiError> {
    let today = Utc::now().date_naive().to_string();
    let sessions = state.sessions.list_upcoming(&email, &today).await?;
    Ok(Json(UpcomingSessionsResponse { sessions }))
}
