//! User model
//!
//! Defines the User entity for the MentorBridge directory. Users are keyed by
//! email and hold a role describing which side of a tutoring session they can
//! occupy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A registered user in the directory.
///
/// The `subjects` list is what a mentor offers (or a mentee seeks); it is
/// empty at signup and replaced wholesale by the subjects-update operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Email address (unique, used as the lookup key everywhere)
    pub email: String,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Which side of a session this user can occupy
    pub role: UserRole,
    /// School grade, free text
    pub grade: String,
    /// School name, free text
    pub school: String,
    /// Zip code, free text
    pub zip_code: String,
    /// Subjects offered or sought
    pub subjects: Vec<String>,
    /// Public URL of the uploaded avatar, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with the given parameters.
    ///
    /// The password must already be hashed; use
    /// `services::password::hash_password()`.
    pub fn new(input: CreateUserInput, password_hash: String) -> Self {
        Self {
            id: 0, // set by the database
            name: input.name,
            email: input.email,
            password_hash,
            role: input.role,
            grade: input.grade,
            school: input.school,
            zip_code: input.zip_code,
            subjects: Vec::new(),
            profile_picture_url: None,
            created_at: Utc::now(),
        }
    }

    /// Check if the user can act as a mentor
    pub fn is_mentor(&self) -> bool {
        matches!(self.role, UserRole::Mentor | UserRole::Both)
    }

    /// Check if the user can act as a mentee
    pub fn is_mentee(&self) -> bool {
        matches!(self.role, UserRole::Mentee | UserRole::Both)
    }
}

/// Which side of a tutoring session a user can occupy.
///
/// `Both` permits acting as either mentor or mentee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Offers tutoring sessions
    Mentor,
    /// Requests tutoring sessions
    Mentee,
    /// Can act as either side
    Both,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Mentor => write!(f, "mentor"),
            UserRole::Mentee => write!(f, "mentee"),
            UserRole::Both => write!(f, "both"),
        }
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mentor" => Ok(UserRole::Mentor),
            "mentee" => Ok(UserRole::Mentee),
            "both" => Ok(UserRole::Both),
            _ => Err(anyhow::anyhow!("Invalid user role: {}", s)),
        }
    }
}

/// Input for creating a new user (before password hashing)
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// User role
    pub role: UserRole,
    /// School grade
    pub grade: String,
    /// School name
    pub school: String,
    /// Zip code
    pub zip_code: String,
}

/// Input for a partial profile update.
///
/// Only the fields that are `Some` are applied; `password` is re-hashed
/// before storage.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    /// New display name (optional)
    pub name: Option<String>,
    /// New grade (optional)
    pub grade: Option<String>,
    /// New role (optional)
    pub role: Option<UserRole>,
    /// New plaintext password (optional, will be hashed)
    pub password: Option<String>,
}

impl UpdateUserInput {
    /// True when no field is set, which the update operation rejects.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.grade.is_none() && self.role.is_none() && self.password.is_none()
    }
}
