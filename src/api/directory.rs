//! Directory API endpoints
//!
//! - GET /api/mentors - Everyone who can mentor
//! - GET /api/mentees - Everyone who can be mentored
//! - GET /api/profile/{email} - One profile
//! - PUT /api/profile - Partial profile update
//! - PUT /api/subjects - Replace a user's subjects
//! - POST /api/profile-picture - Avatar upload (multipart)

use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::UserResponse;
use crate::models::{UpdateUserInput, UserRole};

/// Request body for a partial profile update
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: String,
    pub name: Option<String>,
    pub grade: Option<String>,
    pub role: Option<String>,
    pub new_password: Option<String>,
}

/// Request body for replacing a user's subjects
#[derive(Debug, Deserialize)]
pub struct UpdateSubjectsRequest {
    pub email: String,
    #[serde(default)]
    pub subjects: Vec<String>,
}

/// Response for a profile list
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
}

/// Response for an avatar upload
#[derive(Debug, Serialize)]
pub struct AvatarResponse {
    pub profile_picture_url: String,
    pub user: UserResponse,
}

/// Build the directory router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mentors", get(list_mentors))
        .route("/mentees", get(list_mentees))
        .route("/profile/{email}", get(get_profile))
        .route("/profile", put(update_profile))
        .route("/subjects", put(update_subjects))
        .route("/profile-picture", post(upload_profile_picture))
}

/// GET /api/mentors - List users with role mentor or both
async fn list_mentors(State(state): State<AppState>) -> Result<Json<UserListResponse>, ApiError> {
    let users = state.directory.list_mentors().await?;
    Ok(Json(UserListResponse {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/mentees - List users with role mentee or both
async fn list_mentees(State(state): State<AppState>) -> Result<Json<UserListResponse>, ApiError> {
    let users = state.directory.list_mentees().await?;
    Ok(Json(UserListResponse {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/profile/{email} - Fetch one profile
async fn get_profile(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.directory.get_profile(&email).await?;
    Ok(Json(user.into()))
}

/// PUT /api/profile - Apply a partial profile update
async fn update_profile(
    State(state): State<AppState>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let role = match &body.role {
        Some(role) => Some(
            UserRole::from_str(role)
                .map_err(|_| ApiError::validation_error(format!("Invalid role: {}", role)))?,
        ),
        None => None,
    };

    let update = UpdateUserInput {
        name: body.name,
        grade: body.grade,
        role,
        password: body.new_password,
    };

    let user = state.directory.update_profile(&body.email, update).await?;
    Ok(Json(user.into()))
}

/// PUT /api/subjects - Replace the subjects list wholesale
async fn update_subjects(
    State(state): State<AppState>,
    Json(body): Json<UpdateSubjectsRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    state
        .directory
        .set_subjects(&body.email, body.subjects)
        .await?;
    let user = state.directory.get_profile(&body.email).await?;
    Ok(Json(user.into()))
}

/// POST /api/profile-picture - Upload an avatar
///
/// Accepts multipart/form-data with an `email` field and a `file` field.
/// The user must exist and the content type must be jpeg, png or webp.
async fn upload_profile_picture(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AvatarResponse>, ApiError> {
    let mut email: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation_error(format!("Failed to read multipart: {}", e)))?
    {
        match field.name().unwrap_or("") {
            "email" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation_error(format!("Invalid email field: {}", e)))?;
                email = Some(value);
            }
            "file" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation_error(format!("Failed to read file: {}", e)))?;
                file = Some((content_type, data.to_vec()));
            }
            _ => {}
        }
    }

    let email = email.ok_or_else(|| ApiError::validation_error("Email is required"))?;
    let (content_type, data) =
        file.ok_or_else(|| ApiError::validation_error("No file provided"))?;

    if data.len() as u64 > state.upload_config.max_file_size {
        return Err(ApiError::validation_error(format!(
            "File too large. Maximum size: {} bytes",
            state.upload_config.max_file_size
        )));
    }

    // The user must exist before anything touches the disk
    state.directory.get_profile(&email).await?;

    let url = state.avatars.store(&email, &content_type, &data).await?;
    let user = state.directory.set_avatar_url(&email, &url).await?;

    Ok(Json(AvatarResponse {
        profile_picture_url: url,
        user: user.into(),
    }))
}
