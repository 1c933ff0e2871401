//! Data models
//!
//! This module contains all data structures used throughout MentorBridge.
//! Models represent:
//! - Database entities (User, SessionRequest, Notification, Availability)
//! - Typed operation inputs (CreateUserInput, UpdateUserInput, ...)
//! - Read-side projections (UpcomingSession)

mod availability;
mod notification;
mod session_request;
mod user;

pub use availability::{Availability, TimeSlot};
pub use notification::{kinds as notification_kinds, Notification};
pub use session_request::{
    CreateSessionRequestInput, SessionRequest, SessionStatus, UpcomingSession, ViewerRole,
};
pub use user::{CreateUserInput, UpdateUserInput, User, UserRole};
