//! Services layer - Business logic
//!
//! Services implement the business rules on top of the repositories:
//! validation, the session-request state machine, notification side effects,
//! and credential handling. All services report failures through the shared
//! [`ServiceError`] taxonomy, which the API layer maps onto HTTP statuses.

pub mod availability;
pub mod avatar;
pub mod directory;
pub mod notification;
pub mod password;
pub mod session;
pub mod token;

pub use availability::AvailabilityService;
pub use avatar::AvatarStore;
pub use directory::{AuthPayload, DirectoryService};
pub use notification::{NotificationFeed, NotificationService};
pub use password::{hash_password, verify_password};
pub use session::SessionService;
pub use token::{Claims, TokenService};

/// Error taxonomy shared by every service.
///
/// Business-rule violations are typed at the point of detection; anything
/// unexpected (store failures, broken invariants) travels as `Internal` with
/// its diagnostic chain intact.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A unique key already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or malformed input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Credential mismatch
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Unexpected failure
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Convenience alias used throughout the services layer.
pub type ServiceResult<T> = Result<T, ServiceError>;
