//! Notification API endpoints
//!
//! - GET /api/notifications/{email} - Inbox plus unread count
//! - PUT /api/notifications/read/{id} - Mark one read
//! - PUT /api/notifications/read-all/{email} - Mark everything read

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::Notification;

/// Response for the notification feed
#[derive(Debug, Serialize)]
pub struct NotificationFeedResponse {
    pub notifications: Vec<Notification>,
    pub unread_count: i64,
}

/// Build the notifications router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notifications/{email}", get(get_notifications))
        .route("/notifications/read/{id}", put(mark_notification_read))
        .route("/notifications/read-all/{email}", put(mark_all_notifications_read))
}

/// GET /api/notifications/{email} - Inbox, newest first, with unread count
async fn get_notifications(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<NotificationFeedResponse>, ApiError> {
    let feed = state.notifications.list_for_user(&email).await?;
    Ok(Json(NotificationFeedResponse {
        notifications: feed.notifications,
        unread_count: feed.unread_count,
    }))
}

/// PUT /api/notifications/read/{id} - Mark one notification read
async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.notifications.mark_read(id).await?;
    Ok(Json(serde_json::json!({ "message": "Notification marked as read" })))
}

/// PUT /api/notifications/read-all/{email} - Mark the whole inbox read
async fn mark_all_notifications_read(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.notifications.mark_all_read(&email).await?;
    Ok(Json(serde_json::json!({ "message": "All notifications marked as read" })))
}
