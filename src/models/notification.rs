//! Notification model
//!
//! Notifications are pull-read system messages tied to one recipient email.
//! They are written as side effects of the session workflow and only ever
//! mutated by the read-marking operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A system message for one recipient.
///
/// `kind` is a free-form tag the frontend switches on (`session_request`,
/// `session_accepted`, `session_declined`). The recipient email is not
/// validated against the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier
    pub id: i64,
    /// Recipient's email
    pub user_email: String,
    /// Human-readable message body
    pub message: String,
    /// Free-form tag describing what triggered the notification
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether the recipient has seen this notification
    pub read: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create a new unread notification.
    pub fn new(user_email: String, message: String, kind: String) -> Self {
        Self {
            id: 0, // set by the database
            user_email,
            message,
            kind,
            read: false,
            created_at: Utc::now(),
        }
    }
}

/// Notification kinds emitted by the session workflow.
pub mod kinds {
    /// A mentor received a new session request
    pub const SESSION_REQUEST: &str = "session_request";

    /// Kind for a decided session, `session_accepted` or `session_declined`
    pub fn session_decision(status: &crate::models::SessionStatus) -> String {
        format!("session_{}", status)
    }
}
