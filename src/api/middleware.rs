//! API middleware and shared plumbing
//!
//! Contains the application state handed to every handler and the `ApiError`
//! envelope all endpoints answer failures with.
//!
//! There is deliberately no authentication middleware: endpoints trust the
//! caller-supplied email, and bearer tokens are only issued at signup/login
//! for the frontend to hold.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::UploadConfig;
use crate::services::{
    AvailabilityService, AvatarStore, DirectoryService, NotificationService, ServiceError,
    SessionService, TokenService,
};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::SqlitePool,
    pub directory: Arc<DirectoryService>,
    pub sessions: Arc<SessionService>,
    pub notifications: Arc<NotificationService>,
    pub availability: Arc<AvailabilityService>,
    pub avatars: Arc<AvatarStore>,
    pub tokens: Arc<TokenService>,
    pub upload_config: Arc<UploadConfig>,
}

/// Error response envelope for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    fn status_code(&self) -> StatusCode {
        match self.error.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "CONFLICT" => StatusCode::CONFLICT,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => Self::not_found(msg),
            ServiceError::Conflict(msg) => Self::conflict(msg),
            ServiceError::InvalidInput(msg) => Self::validation_error(msg),
            ServiceError::Unauthorized(msg) => Self::unauthorized(msg),
            ServiceError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                Self::internal_error(e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::validation_error("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::unauthorized("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::internal_error("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_service_error() {
        let api: ApiError = ServiceError::Conflict("Email taken".to_string()).into();
        assert_eq!(api.error.code, "CONFLICT");
        assert!(api.error.message.contains("Email taken"));

        let api: ApiError = ServiceError::InvalidInput("bad role".to_string()).into();
        assert_eq!(api.error.code, "VALIDATION_ERROR");
    }

    #[test]
    fn test_error_envelope_shape() {
        let api = ApiError::not_found("User not found");
        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "User not found");
    }
}
