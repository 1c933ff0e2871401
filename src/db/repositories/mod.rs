//! Repository layer
//!
//! One repository per logical collection, each a trait with a SQLx-backed
//! implementation so services depend on the interface, not the driver.

mod availability;
mod notification;
mod session_request;
mod user;

pub use availability::{AvailabilityRepository, SqlxAvailabilityRepository};
pub use notification::{NotificationRepository, SqlxNotificationRepository};
pub use session_request::{SessionRequestRepository, SqlxSessionRequestRepository};
pub use user::{SqlxUserRepository, UserPatch, UserRepository};
