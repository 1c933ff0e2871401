//! Notification repository
//!
//! Database operations for the per-user notification inbox.

use crate::models::Notification;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Notification repository trait
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Insert a new notification, returning it with its assigned id
    async fn create(&self, notification: &Notification) -> Result<Notification>;

    /// All notifications for a recipient, newest first
    async fn list_for_email(&self, email: &str) -> Result<Vec<Notification>>;

    /// Unread count for a recipient, computed independently of the list
    async fn count_unread(&self, email: &str) -> Result<i64>;

    /// Mark one notification read; returns false when no row matched
    async fn mark_read(&self, id: i64) -> Result<bool>;

    /// Mark all of a recipient's unread notifications read; returns the
    /// number of rows updated (zero is fine)
    async fn mark_all_read(&self, email: &str) -> Result<u64>;
}

/// SQLx-based notification repository implementation
pub struct SqlxNotificationRepository {
    pool: SqlitePool,
}

impl SqlxNotificationRepository {
    /// Create a new SQLx notification repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn NotificationRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl NotificationRepository for SqlxNotificationRepository {
    async fn create(&self, notification: &Notification) -> Result<Notification> {
        let result = sqlx::query(
            r#"
            INSERT INTO notifications (user_email, message, kind, read, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&notification.user_email)
        .bind(&notification.message)
        .bind(&notification.kind)
        .bind(notification.read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create notification")?;

        let mut created = notification.clone();
        created.id = result.last_insert_rowid();
        Ok(created)
    }

    async fn list_for_email(&self, email: &str) -> Result<Vec<Notification>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_email, message, kind, read, created_at
            FROM notifications
            WHERE user_email = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list notifications")?;

        Ok(rows.iter().map(row_to_notification).collect())
    }

    async fn count_unread(&self, email: &str) -> Result<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM notifications WHERE user_email = ? AND read = 0",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .context("Failed to count unread notifications")?;
        Ok(row.get("count"))
    }

    async fn mark_read(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to mark notification read")?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, email: &str) -> Result<u64> {
        let result =
            sqlx::query("UPDATE notifications SET read = 1 WHERE user_email = ? AND read = 0")
                .bind(email)
                .execute(&self.pool)
                .await
                .context("Failed to mark all notifications read")?;
        Ok(result.rows_affected())
    }
}

fn row_to_notification(row: &sqlx::sqlite::SqliteRow) -> Notification {
    Notification {
        id: row.get("id"),
        user_email: row.get("user_email"),
        message: row.get("message"),
        kind: row.get("kind"),
        read: row.get("read"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxNotificationRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxNotificationRepository::new(pool)
    }

    fn test_notification(email: &str, message: &str) -> Notification {
        Notification::new(
            email.to_string(),
            message.to_string(),
            "session_request".to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_and_list_newest_first() {
        let repo = setup_test_repo().await;
        repo.create(&test_notification("a@example.com", "first"))
            .await
            .unwrap();
        repo.create(&test_notification("a@example.com", "second"))
            .await
            .unwrap();
        repo.create(&test_notification("b@example.com", "other inbox"))
            .await
            .unwrap();

        let list = repo.list_for_email("a@example.com").await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].message, "second");
        assert_eq!(list[1].message, "first");
    }

    #[tokio::test]
    async fn test_count_unread_and_mark_read() {
        let repo = setup_test_repo().await;
        let n1 = repo
            .create(&test_notification("a@example.com", "one"))
            .await
            .unwrap();
        repo.create(&test_notification("a@example.com", "two"))
            .await
            .unwrap();

        assert_eq!(repo.count_unread("a@example.com").await.unwrap(), 2);

        let matched = repo.mark_read(n1.id).await.unwrap();
        assert!(matched);
        assert_eq!(repo.count_unread("a@example.com").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_mark_read_no_match() {
        let repo = setup_test_repo().await;
        let matched = repo.mark_read(999).await.unwrap();
        assert!(!matched);
    }

    #[tokio::test]
    async fn test_mark_all_read_is_idempotent() {
        let repo = setup_test_repo().await;

        // No notifications at all: still a successful no-op
        assert_eq!(repo.mark_all_read("empty@example.com").await.unwrap(), 0);

        repo.create(&test_notification("a@example.com", "one"))
            .await
            .unwrap();
        repo.create(&test_notification("a@example.com", "two"))
            .await
            .unwrap();

        assert_eq!(repo.mark_all_read("a@example.com").await.unwrap(), 2);
        assert_eq!(repo.count_unread("a@example.com").await.unwrap(), 0);
        assert_eq!(repo.mark_all_read("a@example.com").await.unwrap(), 0);
    }
}
