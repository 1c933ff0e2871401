//! Session request repository
//!
//! Database operations for the session-request workflow. Status writes are
//! unconditional; the workflow service decides what transitions mean.

use crate::models::{SessionRequest, SessionStatus};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

/// Session request repository trait
#[async_trait]
pub trait SessionRequestRepository: Send + Sync {
    /// Insert a new request, returning it with its assigned id
    async fn create(&self, request: &SessionRequest) -> Result<SessionRequest>;

    /// Look a request up by id
    async fn get_by_id(&self, id: i64) -> Result<Option<SessionRequest>>;

    /// Overwrite the status; returns false when no row matched the id
    async fn set_status(&self, id: i64, status: SessionStatus) -> Result<bool>;

    /// All requests where the email is either party, any status
    async fn list_for_email(&self, email: &str) -> Result<Vec<SessionRequest>>;

    /// Accepted requests for either party with `scheduled_date >= today`,
    /// ascending by date
    async fn list_upcoming(&self, email: &str, today: &str) -> Result<Vec<SessionRequest>>;
}

/// SQLx-based session request repository implementation
pub struct SqlxSessionRequestRepository {
    pool: SqlitePool,
}

impl SqlxSessionRequestRepository {
    /// Create a new SQLx session request repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn SessionRequestRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SessionRequestRepository for SqlxSessionRequestRepository {
    async fn create(&self, request: &SessionRequest) -> Result<SessionRequest> {
        let result = sqlx::query(
            r#"
            INSERT INTO session_requests (mentee_email, mentor_email, subject, message, scheduled_date, scheduled_time, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.mentee_email)
        .bind(&request.mentor_email)
        .bind(&request.subject)
        .bind(&request.message)
        .bind(&request.scheduled_date)
        .bind(&request.scheduled_time)
        .bind(request.status.to_string())
        .bind(request.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create session request")?;

        let mut created = request.clone();
        created.id = result.last_insert_rowid();
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<SessionRequest>> {
        let row = sqlx::query(
            r#"
            SELECT id, mentee_email, mentor_email, subject, message, scheduled_date, scheduled_time, status, created_at
            FROM session_requests
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get session request")?;

        match row {
            Some(row) => Ok(Some(row_to_request(&row)?)),
            None => Ok(None),
        }
    }

    async fn set_status(&self, id: i64, status: SessionStatus) -> Result<bool> {
        let result = sqlx::query("UPDATE session_requests SET status = ? WHERE id = ?")
            .bind(status.to_string())
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update session status")?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_for_email(&self, email: &str) -> Result<Vec<SessionRequest>> {
        let rows = sqlx::query(
            r#"
            SELECT id, mentee_email, mentor_email, subject, message, scheduled_date, scheduled_time, status, created_at
            FROM session_requests
            WHERE mentee_email = ? OR mentor_email = ?
            "#,
        )
        .bind(email)
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list session requests")?;

        rows.iter().map(row_to_request).collect()
    }

    async fn list_upcoming(&self, email: &str, today: &str) -> Result<Vec<SessionRequest>> {
        let rows = sqlx::query(
            r#"
            SELECT id, mentee_email, mentor_email, subject, message, scheduled_date, scheduled_time, status, created_at
            FROM session_requests
            WHERE (mentee_email = ? OR mentor_email = ?)
              AND status = 'accepted'
              AND scheduled_date >= ?
            ORDER BY scheduled_date ASC
            "#,
        )
        .bind(email)
        .bind(email)
        .bind(today)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list upcoming sessions")?;

        rows.iter().map(row_to_request).collect()
    }
}

fn row_to_request(row: &sqlx::sqlite::SqliteRow) -> Result<SessionRequest> {
    let status_str: String = row.get("status");
    let status = SessionStatus::from_str(&status_str)
        .with_context(|| format!("Invalid session status in database: {}", status_str))?;

    Ok(SessionRequest {
        id: row.get("id"),
        mentee_email: row.get("mentee_email"),
        mentor_email: row.get("mentor_email"),
        subject: row.get("subject"),
        message: row.get("message"),
        scheduled_date: row.get("scheduled_date"),
        scheduled_time: row.get("scheduled_time"),
        status,
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use crate::models::CreateSessionRequestInput;

    async fn setup_test_repo() -> SqlxSessionRequestRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxSessionRequestRepository::new(pool)
    }

    fn test_request(date: Option<&str>) -> SessionRequest {
        SessionRequest::new(CreateSessionRequestInput {
            mentee_email: "mentee@example.com".to_string(),
            mentor_email: "mentor@example.com".to_string(),
            subject: "Math".to_string(),
            message: "Need help".to_string(),
            scheduled_date: date.map(String::from),
            scheduled_time: date.map(|_| "14:00-15:00".to_string()),
        })
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = setup_test_repo().await;
        let created = repo
            .create(&test_request(None))
            .await
            .expect("Failed to create request");
        assert!(created.id > 0);

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get")
            .expect("Request not found");
        assert_eq!(found.status, SessionStatus::Pending);
        assert_eq!(found.subject, "Math");
        assert!(found.scheduled_date.is_none());
    }

    #[tokio::test]
    async fn test_set_status() {
        let repo = setup_test_repo().await;
        let created = repo.create(&test_request(None)).await.unwrap();

        let matched = repo
            .set_status(created.id, SessionStatus::Accepted)
            .await
            .expect("Failed to set status");
        assert!(matched);

        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.status, SessionStatus::Accepted);
    }

    #[tokio::test]
    async fn test_set_status_no_match() {
        let repo = setup_test_repo().await;
        let matched = repo
            .set_status(999, SessionStatus::Declined)
            .await
            .expect("Query should succeed");
        assert!(!matched);
    }

    #[tokio::test]
    async fn test_list_for_email_matches_either_side() {
        let repo = setup_test_repo().await;
        repo.create(&test_request(None)).await.unwrap();

        let as_mentee = repo.list_for_email("mentee@example.com").await.unwrap();
        let as_mentor = repo.list_for_email("mentor@example.com").await.unwrap();
        let other = repo.list_for_email("other@example.com").await.unwrap();

        assert_eq!(as_mentee.len(), 1);
        assert_eq!(as_mentor.len(), 1);
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_list_upcoming_filters_and_orders() {
        let repo = setup_test_repo().await;

        let past = repo.create(&test_request(Some("2023-12-01"))).await.unwrap();
        let today = repo.create(&test_request(Some("2024-01-01"))).await.unwrap();
        let future = repo.create(&test_request(Some("2024-02-01"))).await.unwrap();
        let pending_future = repo.create(&test_request(Some("2024-03-01"))).await.unwrap();

        for id in [past.id, today.id, future.id] {
            repo.set_status(id, SessionStatus::Accepted).await.unwrap();
        }
        // pending_future stays pending

        let upcoming = repo
            .list_upcoming("mentee@example.com", "2024-01-01")
            .await
            .expect("Failed to list upcoming");

        let dates: Vec<_> = upcoming
            .iter()
            .map(|s| s.scheduled_date.clone().unwrap())
            .collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-02-01"]);
        assert!(upcoming.iter().all(|s| s.status == SessionStatus::Accepted));
        let _ = pending_future;
    }
}
