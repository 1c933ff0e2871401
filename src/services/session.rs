//! Session workflow service
//!
//! The session-request lifecycle: a mentee files a request (pending), the
//! mentor accepts or declines it, and each step writes a notification for the
//! other side. Notification writes are a best-effort side effect; a status
//! change never rolls back because its notification could not be stored.

use crate::db::repositories::{NotificationRepository, SessionRequestRepository, UserRepository};
use crate::models::{
    notification_kinds, CreateSessionRequestInput, Notification, SessionRequest, SessionStatus,
    UpcomingSession, ViewerRole,
};
use crate::services::{ServiceError, ServiceResult};
use anyhow::Context;
use std::sync::Arc;

/// Session workflow service.
pub struct SessionService {
    session_repo: Arc<dyn SessionRequestRepository>,
    user_repo: Arc<dyn UserRepository>,
    notification_repo: Arc<dyn NotificationRepository>,
}

impl SessionService {
    /// Create a new session service.
    pub fn new(
        session_repo: Arc<dyn SessionRequestRepository>,
        user_repo: Arc<dyn UserRepository>,
        notification_repo: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            session_repo,
            user_repo,
            notification_repo,
        }
    }

    /// File a new session request.
    ///
    /// `scheduled_date` and `scheduled_time` must be both present or both
    /// absent. When the mentor exists in the directory a `session_request`
    /// notification is written for them; a missing mentor is tolerated
    /// silently. The mentee is never validated.
    pub async fn create_request(
        &self,
        input: CreateSessionRequestInput,
    ) -> ServiceResult<SessionRequest> {
        if input.mentee_email.is_empty() || input.mentor_email.is_empty() || input.subject.is_empty()
        {
            return Err(ServiceError::InvalidInput(
                "mentee_email, mentor_email and subject are required".to_string(),
            ));
        }
        if input.scheduled_date.is_some() != input.scheduled_time.is_some() {
            return Err(ServiceError::InvalidInput(
                "scheduled_date and scheduled_time must be provided together".to_string(),
            ));
        }

        let request = self
            .session_repo
            .create(&SessionRequest::new(input))
            .await
            .context("Failed to create session request")?;

        let mentor = self
            .user_repo
            .get_by_email(&request.mentor_email)
            .await
            .context("Failed to look up mentor")?;
        if mentor.is_some() {
            let message = match (&request.scheduled_date, &request.scheduled_time) {
                (Some(date), Some(time)) => format!(
                    "New session request for {} on {} at {}",
                    request.subject, date, time
                ),
                _ => format!(
                    "New session request for {} from {}",
                    request.subject, request.mentee_email
                ),
            };
            self.enqueue_notification(
                &request.mentor_email,
                message,
                notification_kinds::SESSION_REQUEST.to_string(),
            )
            .await;
        }

        Ok(request)
    }

    /// Accept or decline a session request.
    ///
    /// Only `accepted` and `declined` are valid targets. The write is an
    /// unconditional overwrite: transitioning an already-decided request
    /// succeeds and re-notifies the mentee. The notification is written after
    /// re-reading the session and is never rolled back on failure.
    pub async fn transition_status(
        &self,
        session_id: i64,
        new_status: SessionStatus,
    ) -> ServiceResult<SessionRequest> {
        if !new_status.is_decision() {
            return Err(ServiceError::InvalidInput(format!(
                "Invalid status: {}",
                new_status
            )));
        }

        let matched = self
            .session_repo
            .set_status(session_id, new_status)
            .await
            .context("Failed to update session status")?;
        if !matched {
            return Err(ServiceError::NotFound("Session not found".to_string()));
        }

        let session = self
            .session_repo
            .get_by_id(session_id)
            .await
            .context("Failed to re-read session")?;

        if let Some(session) = &session {
            self.enqueue_notification(
                &session.mentee_email,
                format!(
                    "Your session request for {} was {}",
                    session.subject, session.status
                ),
                notification_kinds::session_decision(&session.status),
            )
            .await;
        }

        session.ok_or_else(|| ServiceError::NotFound("Session not found".to_string()))
    }

    /// All sessions where the email is either party, any status.
    pub async fn list_for_user(&self, email: &str) -> ServiceResult<Vec<SessionRequest>> {
        Ok(self
            .session_repo
            .list_for_email(email)
            .await
            .context("Failed to list sessions")?)
    }

    /// Accepted sessions scheduled for `today` or later, ascending by date,
    /// each annotated with the other party's display name and the side the
    /// querying email occupies.
    pub async fn list_upcoming(
        &self,
        email: &str,
        today: &str,
    ) -> ServiceResult<Vec<UpcomingSession>> {
        let sessions = self
            .session_repo
            .list_upcoming(email, today)
            .await
            .context("Failed to list upcoming sessions")?;

        let mut upcoming = Vec::with_capacity(sessions.len());
        for session in sessions {
            let (other_email, viewer_role) = if session.mentee_email == email {
                (session.mentor_email.clone(), ViewerRole::Mentee)
            } else {
                (session.mentee_email.clone(), ViewerRole::Mentor)
            };

            let other_person = self
                .user_repo
                .get_by_email(&other_email)
                .await
                .context("Failed to look up counterpart")?
                .map(|user| user.name)
                .unwrap_or(other_email);

            upcoming.push(UpcomingSession {
                session,
                other_person,
                viewer_role,
            });
        }

        Ok(upcoming)
    }

    /// Best-effort notification write; a failure is logged and swallowed.
    async fn enqueue_notification(&self, user_email: &str, message: String, kind: String) {
        let notification = Notification::new(user_email.to_string(), message, kind);
        if let Err(e) = self.notification_repo.create(&notification).await {
            tracing::warn!(
                "Failed to enqueue {} notification for {}: {:#}",
                notification.kind,
                user_email,
                e
            );
        }
    }
}
