//! Shared API response types
//!
//! Common response structures used across endpoints, keeping the wire shape
//! in one place.

use serde::Serialize;

use crate::models::User;

/// Public view of a user, never carrying the password hash
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub grade: String,
    pub school: String,
    #[serde(rename = "zipCode")]
    pub zip_code: String,
    pub subjects: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.to_string(),
            grade: user.grade,
            school: user.school,
            zip_code: user.zip_code,
            subjects: user.subjects,
            profile_picture_url: user.profile_picture_url,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Response for successful signup/login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}
