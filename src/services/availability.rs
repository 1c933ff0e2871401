//! Availability service
//!
//! Maintains the at-most-one-record-per-mentor invariant with a
//! delete-then-insert replacement. The two steps are not transactional: a
//! crash in between leaves the mentor with no availability, which reads as
//! the empty state. Callers tolerate that window.

use crate::db::repositories::AvailabilityRepository;
use crate::models::{Availability, TimeSlot};
use crate::services::ServiceResult;
use anyhow::Context;
use std::sync::Arc;

/// Mentor availability service.
pub struct AvailabilityService {
    availability_repo: Arc<dyn AvailabilityRepository>,
}

impl AvailabilityService {
    /// Create a new availability service.
    pub fn new(availability_repo: Arc<dyn AvailabilityRepository>) -> Self {
        Self { availability_repo }
    }

    /// Replace the mentor's slots wholesale.
    ///
    /// Existing records are deleted first; a new record is inserted only when
    /// `slots` is non-empty, so an empty input leaves the mentor with no
    /// record at all.
    pub async fn set_slots(&self, mentor_email: &str, slots: Vec<TimeSlot>) -> ServiceResult<()> {
        self.availability_repo
            .delete_for_mentor(mentor_email)
            .await
            .context("Failed to clear availability")?;

        if !slots.is_empty() {
            self.availability_repo
                .insert(&Availability::new(mentor_email.to_string(), slots))
                .await
                .context("Failed to store availability")?;
        }

        Ok(())
    }

    /// The mentor's current slots; an absent record reads as an empty list.
    pub async fn get_slots(&self, mentor_email: &str) -> ServiceResult<Vec<TimeSlot>> {
        let record = self
            .availability_repo
            .get_for_mentor(mentor_email)
            .await
            .context("Failed to read availability")?;
        Ok(record.map(|r| r.time_slots).unwrap_or_default())
    }
}
