//! Site info API endpoints
//!
//! - GET /api/health - Liveness plus database reachability

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::Row;

use crate::api::middleware::{ApiError, AppState};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub user_count: i64,
}

/// Build the site router
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /api/health - Report service and database health
async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM users")
        .fetch_one(&state.pool)
        .await
        .map_err(|e| ApiError::internal_error(format!("Database unreachable: {}", e)))?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        user_count: row.get("count"),
    }))
}
