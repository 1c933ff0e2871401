//! Availability model
//!
//! A mentor's current set of bookable time slots. The record is always
//! replaced wholesale; "no availability" is the absence of a record, never a
//! stored empty list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A mentor's current availability record (at most one per mentor).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    /// Unique identifier
    pub id: i64,
    /// Owning mentor's email
    pub mentor_email: String,
    /// Ordered bookable slots
    pub time_slots: Vec<TimeSlot>,
    /// Last replacement timestamp
    pub updated_at: DateTime<Utc>,
}

impl Availability {
    /// Create a new availability record.
    pub fn new(mentor_email: String, time_slots: Vec<TimeSlot>) -> Self {
        Self {
            id: 0, // set by the database
            mentor_email,
            time_slots,
            updated_at: Utc::now(),
        }
    }
}

/// One recurring bookable slot.
///
/// All fields are free text supplied by the frontend ("Monday",
/// "16:00", "17:00"); the backend stores and returns them opaquely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Day of week
    pub day: String,
    /// Slot start
    pub start_time: String,
    /// Slot end
    pub end_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_slot_round_trip() {
        let slot = TimeSlot {
            day: "Monday".to_string(),
            start_time: "16:00".to_string(),
            end_time: "17:00".to_string(),
        };
        let json = serde_json::to_string(&slot).unwrap();
        let back: TimeSlot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, slot);
    }

    #[test]
    fn test_availability_preserves_slot_order() {
        let slots = vec![
            TimeSlot {
                day: "Friday".to_string(),
                start_time: "10:00".to_string(),
                end_time: "11:00".to_string(),
            },
            TimeSlot {
                day: "Monday".to_string(),
                start_time: "16:00".to_string(),
                end_time: "17:00".to_string(),
            },
        ];
        let availability = Availability::new("mentor@example.com".to_string(), slots.clone());
        assert_eq!(availability.time_slots, slots);
    }
}
