//! Availability repository
//!
//! Database operations for mentor availability. The at-most-one-record
//! invariant is maintained by the delete-then-insert replacement in the
//! availability service; this layer only provides the primitives.

use crate::models::{Availability, TimeSlot};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Availability repository trait
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Delete every record for the mentor, returning how many were removed
    async fn delete_for_mentor(&self, mentor_email: &str) -> Result<u64>;

    /// Insert a new record, returning it with its assigned id
    async fn insert(&self, availability: &Availability) -> Result<Availability>;

    /// The mentor's live record, if any
    async fn get_for_mentor(&self, mentor_email: &str) -> Result<Option<Availability>>;
}

/// SQLx-based availability repository implementation
pub struct SqlxAvailabilityRepository {
    pool: SqlitePool,
}

impl SqlxAvailabilityRepository {
    /// Create a new SQLx availability repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn AvailabilityRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl AvailabilityRepository for SqlxAvailabilityRepository {
    async fn delete_for_mentor(&self, mentor_email: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM availability WHERE mentor_email = ?")
            .bind(mentor_email)
            .execute(&self.pool)
            .await
            .context("Failed to delete availability")?;
        Ok(result.rows_affected())
    }

    async fn insert(&self, availability: &Availability) -> Result<Availability> {
        let slots_json = serde_json::to_string(&availability.time_slots)
            .context("Failed to encode time slots")?;

        let result = sqlx::query(
            r#"
            INSERT INTO availability (mentor_email, time_slots, updated_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&availability.mentor_email)
        .bind(&slots_json)
        .bind(availability.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert availability")?;

        let mut created = availability.clone();
        created.id = result.last_insert_rowid();
        Ok(created)
    }

    async fn get_for_mentor(&self, mentor_email: &str) -> Result<Option<Availability>> {
        let row = sqlx::query(
            r#"
            SELECT id, mentor_email, time_slots, updated_at
            FROM availability
            WHERE mentor_email = ?
            "#,
        )
        .bind(mentor_email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get availability")?;

        match row {
            Some(row) => {
                let slots_json: String = row.get("time_slots");
                let time_slots: Vec<TimeSlot> = serde_json::from_str(&slots_json)
                    .context("Invalid time slots JSON in database")?;
                Ok(Some(Availability {
                    id: row.get("id"),
                    mentor_email: row.get("mentor_email"),
                    time_slots,
                    updated_at: row.get("updated_at"),
                }))
            }
            None => Ok(None),
        }
    }
}
