//! Notification service
//!
//! Read and read-marking operations on the per-user inbox. Writes come from
//! the session workflow; this service never creates notifications itself
//! apart from forwarding an explicit enqueue.

use crate::db::repositories::NotificationRepository;
use crate::models::Notification;
use crate::services::{ServiceError, ServiceResult};
use anyhow::Context;
use std::sync::Arc;

/// A recipient's inbox: the full newest-first list plus the unread count.
///
/// The count is computed by an independent query, so the two can momentarily
/// disagree under concurrent writes.
#[derive(Debug, Clone)]
pub struct NotificationFeed {
    pub notifications: Vec<Notification>,
    pub unread_count: i64,
}

/// Notification inbox service.
pub struct NotificationService {
    notification_repo: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    /// Create a new notification service.
    pub fn new(notification_repo: Arc<dyn NotificationRepository>) -> Self {
        Self { notification_repo }
    }

    /// Insert a notification for a recipient. No deduplication, no recipient
    /// validation.
    pub async fn enqueue(
        &self,
        user_email: &str,
        message: &str,
        kind: &str,
    ) -> ServiceResult<Notification> {
        Ok(self
            .notification_repo
            .create(&Notification::new(
                user_email.to_string(),
                message.to_string(),
                kind.to_string(),
            ))
            .await
            .context("Failed to enqueue notification")?)
    }

    /// The recipient's inbox, newest first, with the unread count.
    pub async fn list_for_user(&self, email: &str) -> ServiceResult<NotificationFeed> {
        let notifications = self
            .notification_repo
            .list_for_email(email)
            .await
            .context("Failed to list notifications")?;
        let unread_count = self
            .notification_repo
            .count_unread(email)
            .await
            .context("Failed to count unread notifications")?;
        Ok(NotificationFeed {
            notifications,
            unread_count,
        })
    }

    /// Mark a single notification read.
    pub async fn mark_read(&self, id: i64) -> ServiceResult<()> {
        let matched = self
            .notification_repo
            .mark_read(id)
            .await
            .context("Failed to mark notification read")?;
        if !matched {
            return Err(ServiceError::NotFound("Notification not found".to_string()));
        }
        Ok(())
    }

    /// Mark everything unread for the recipient as read. Succeeds even when
    /// nothing matches.
    pub async fn mark_all_read(&self, email: &str) -> ServiceResult<()> {
        self.notification_repo
            .mark_all_read(email)
            .await
            .context("Failed to mark all notifications read")?;
        Ok(())
    }
}
