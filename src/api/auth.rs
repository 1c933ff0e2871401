//! Authentication API endpoints
//!
//! - POST /api/signup - Account registration
//! - POST /api/login - Credential login

use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::str::FromStr;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::AuthResponse;
use crate::models::{CreateUserInput, UserRole};

/// Request body for account registration
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub grade: String,
    pub role: String,
    #[serde(default)]
    pub school: String,
    #[serde(default, rename = "zipCode")]
    pub zip_code: String,
}

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Build the auth router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// POST /api/signup - Register a new account
async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let role = UserRole::from_str(&body.role)
        .map_err(|_| ApiError::validation_error(format!("Invalid role: {}", body.role)))?;

    let input = CreateUserInput {
        name: body.name,
        email: body.email,
        role,
        grade: body.grade,
        school: body.school,
        zip_code: body.zip_code,
    };

    let payload = state.directory.signup(input, &body.password).await?;
    Ok(Json(AuthResponse {
        token: payload.token,
        user: payload.user.into(),
    }))
}

/// POST /api/login - Authenticate and issue a bearer token
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let payload = state.directory.login(&body.email, &body.password).await?;
    Ok(Json(AuthResponse {
        token: payload.token,
        user: payload.user.into(),
    }))
}
