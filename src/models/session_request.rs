//! Session request model
//!
//! A session request is a proposed tutoring engagement between a mentee and a
//! mentor. It starts `pending` and is moved to `accepted` or `declined` by the
//! mentor; the status transition is the only mutation the record ever sees.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A proposed tutoring engagement between a mentee and a mentor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRequest {
    /// Unique identifier
    pub id: i64,
    /// Requesting mentee's email (not validated against the directory)
    pub mentee_email: String,
    /// Target mentor's email
    pub mentor_email: String,
    /// Subject the session is about
    pub subject: String,
    /// Free-text message from the mentee
    pub message: String,
    /// Proposed date, ISO format (e.g. "2024-03-15"); set only by the
    /// scheduled request variant, together with `scheduled_time`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    /// Proposed time range (e.g. "14:00-15:00")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    /// Current lifecycle state
    pub status: SessionStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl SessionRequest {
    /// Create a new pending session request.
    pub fn new(input: CreateSessionRequestInput) -> Self {
        Self {
            id: 0, // set by the database
            mentee_email: input.mentee_email,
            mentor_email: input.mentor_email,
            subject: input.subject,
            message: input.message,
            scheduled_date: input.scheduled_date,
            scheduled_time: input.scheduled_time,
            status: SessionStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

/// Lifecycle state of a session request.
///
/// `Pending` is the initial state; `Accepted` and `Declined` are terminal.
/// Writes to a terminal state are not rejected: a later transition overwrites
/// the status unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Awaiting the mentor's decision
    Pending,
    /// Accepted by the mentor
    Accepted,
    /// Declined by the mentor
    Declined,
}

impl SessionStatus {
    /// True for the states a transition may target.
    pub fn is_decision(&self) -> bool {
        matches!(self, SessionStatus::Accepted | SessionStatus::Declined)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Pending => write!(f, "pending"),
            SessionStatus::Accepted => write!(f, "accepted"),
            SessionStatus::Declined => write!(f, "declined"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(SessionStatus::Pending),
            "accepted" => Ok(SessionStatus::Accepted),
            "declined" => Ok(SessionStatus::Declined),
            _ => Err(anyhow::anyhow!("Invalid session status: {}", s)),
        }
    }
}

/// Input for creating a session request.
///
/// `scheduled_date` and `scheduled_time` must be both present or both absent.
#[derive(Debug, Clone)]
pub struct CreateSessionRequestInput {
    /// Requesting mentee's email
    pub mentee_email: String,
    /// Target mentor's email
    pub mentor_email: String,
    /// Subject of the session
    pub subject: String,
    /// Free-text message
    pub message: String,
    /// Proposed date (scheduled variant only)
    pub scheduled_date: Option<String>,
    /// Proposed time range (scheduled variant only)
    pub scheduled_time: Option<String>,
}

/// Which side of a session the querying user occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewerRole {
    /// The querying email is the session's mentee
    Mentee,
    /// The querying email is the session's mentor
    Mentor,
}

/// An accepted, future-dated session annotated for one viewer.
///
/// `other_person` is the counterparty's display name, falling back to their
/// email when the directory lookup misses.
#[derive(Debug, Clone, Serialize)]
pub struct UpcomingSession {
    /// The underlying session request
    #[serde(flatten)]
    pub session: SessionRequest,
    /// Display name (or email) of the other party
    pub other_person: String,
    /// Side of the session the querying email occupies
    pub viewer_role: ViewerRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> CreateSessionRequestInput {
        CreateSessionRequestInput {
            mentee_email: "mentee@example.com".to_string(),
            mentor_email: "mentor@example.com".to_string(),
            subject: "Math".to_string(),
            message: "Need help with calculus".to_string(),
            scheduled_date: None,
            scheduled_time: None,
        }
    }

    #[test]
    fn test_new_request_is_pending() {
        let request = SessionRequest::new(input());
        assert_eq!(request.id, 0);
        assert_eq!(request.status, SessionStatus::Pending);
        assert!(request.scheduled_date.is_none());
    }

    #[test]
    fn test_status_display_round_trip() {
        for status in [
            SessionStatus::Pending,
            SessionStatus::Accepted,
            SessionStatus::Declined,
        ] {
            assert_eq!(
                SessionStatus::from_str(&status.to_string()).unwrap(),
                status
            );
        }
        assert!(SessionStatus::from_str("cancelled").is_err());
    }

    #[test]
    fn test_is_decision() {
        assert!(!SessionStatus::Pending.is_decision());
        assert!(SessionStatus::Accepted.is_decision());
        assert!(SessionStatus::Declined.is_decision());
    }

    #[test]
    fn test_upcoming_session_flattens() {
        let upcoming = UpcomingSession {
            session: SessionRequest::new(input()),
            other_person: "Alex Rivera".to_string(),
            viewer_role: ViewerRole::Mentee,
        };
        let json = serde_json::to_value(&upcoming).unwrap();
        assert_eq!(json["subject"], "Math");
        assert_eq!(json["other_person"], "Alex Rivera");
        assert_eq!(json["viewer_role"], "mentee");
    }
}
