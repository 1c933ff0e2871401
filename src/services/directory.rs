//! Directory service
//!
//! Business rules for the user directory: signup, login, profile reads and
//! partial updates, subjects replacement, and avatar URL assignment.
//! Credential work (hashing, token issuance) is delegated to the password
//! and token modules.

use crate::db::repositories::{UserPatch, UserRepository};
use crate::models::{CreateUserInput, UpdateUserInput, User, UserRole};
use crate::services::password::{hash_password, verify_password};
use crate::services::token::TokenService;
use crate::services::{ServiceError, ServiceResult};
use anyhow::Context;
use std::sync::Arc;

/// A user plus the bearer token issued for them, returned by signup and login.
#[derive(Debug, Clone)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
}

/// Directory service for user accounts and lookup.
pub struct DirectoryService {
    user_repo: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
}

impl DirectoryService {
    /// Create a new directory service.
    pub fn new(user_repo: Arc<dyn UserRepository>, tokens: Arc<TokenService>) -> Self {
        Self { user_repo, tokens }
    }

    /// Register a new account.
    ///
    /// Fails with `Conflict` when the email is already registered. The new
    /// user starts with an empty subjects list and no avatar.
    pub async fn signup(&self, input: CreateUserInput, password: &str) -> ServiceResult<AuthPayload> {
        if input.email.is_empty() || input.name.is_empty() || password.is_empty() {
            return Err(ServiceError::InvalidInput(
                "name, email and password are required".to_string(),
            ));
        }

        if self
            .user_repo
            .get_by_email(&input.email)
            .await
            .context("Failed to check email")?
            .is_some()
        {
            return Err(ServiceError::Conflict(format!(
                "Email '{}' is already registered",
                input.email
            )));
        }

        let password_hash = hash_password(password).context("Failed to hash password")?;
        let user = self
            .user_repo
            .create(&User::new(input, password_hash))
            .await
            .context("Failed to create user")?;

        let token = self
            .tokens
            .issue_token(&user.email, user.id)
            .context("Failed to issue token")?;

        tracing::info!("New {} account registered: {}", user.role, user.email);
        Ok(AuthPayload { user, token })
    }

    /// Authenticate with email and password.
    ///
    /// Unknown email and wrong password produce the same `Unauthorized`
    /// result so login cannot be used to probe for accounts.
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<AuthPayload> {
        let user = self
            .user_repo
            .get_by_email(email)
            .await
            .context("Failed to look up user")?
            .ok_or_else(|| ServiceError::Unauthorized("Invalid email or password".to_string()))?;

        let valid = verify_password(password, &user.password_hash)
            .context("Failed to verify password")?;
        if !valid {
            return Err(ServiceError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        let token = self
            .tokens
            .issue_token(&user.email, user.id)
            .context("Failed to issue token")?;

        Ok(AuthPayload { user, token })
    }

    /// Look a profile up by email.
    pub async fn get_profile(&self, email: &str) -> ServiceResult<User> {
        self.user_repo
            .get_by_email(email)
            .await
            .context("Failed to look up user")?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    /// Everyone who can act as a mentor.
    pub async fn list_mentors(&self) -> ServiceResult<Vec<User>> {
        Ok(self
            .user_repo
            .list_by_roles(&[UserRole::Mentor, UserRole::Both])
            .await
            .context("Failed to list mentors")?)
    }

    /// Everyone who can act as a mentee.
    pub async fn list_mentees(&self) -> ServiceResult<Vec<User>> {
        Ok(self
            .user_repo
            .list_by_roles(&[UserRole::Mentee, UserRole::Both])
            .await
            .context("Failed to list mentees")?)
    }

    /// Apply a partial profile update and return the refreshed user.
    ///
    /// An update with no fields set is rejected; a new password is re-hashed
    /// before storage.
    pub async fn update_profile(&self, email: &str, update: UpdateUserInput) -> ServiceResult<User> {
        if update.is_empty() {
            return Err(ServiceError::InvalidInput("No updates provided".to_string()));
        }

        let password_hash = match &update.password {
            Some(password) => Some(hash_password(password).context("Failed to hash password")?),
            None => None,
        };

        let patch = UserPatch {
            name: update.name,
            grade: update.grade,
            role: update.role,
            password_hash,
        };

        let matched = self
            .user_repo
            .update_fields(email, &patch)
            .await
            .context("Failed to update user")?;
        if !matched {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }

        self.get_profile(email).await
    }

    /// Replace the subjects list wholesale.
    pub async fn set_subjects(&self, email: &str, subjects: Vec<String>) -> ServiceResult<()> {
        let matched = self
            .user_repo
            .set_subjects(email, &subjects)
            .await
            .context("Failed to update subjects")?;
        if !matched {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    /// Store the public URL of a freshly uploaded avatar and return the
    /// refreshed user.
    pub async fn set_avatar_url(&self, email: &str, url: &str) -> ServiceResult<User> {
        let matched = self
            .user_repo
            .set_avatar_url(email, url)
            .await
            .context("Failed to update avatar URL")?;
        if !matched {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }
        self.get_profile(email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxUserRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> DirectoryService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        DirectoryService::new(
            SqlxUserRepository::boxed(pool),
            Arc::new(TokenService::new("test-secret")),
        )
    }

    fn signup_input(email: &str, role: UserRole) -> CreateUserInput {
        CreateUserInput {
            name: "Jordan Lee".to_string(),
            email: email.to_string(),
            role,
            grade: "11".to_string(),
            school: "Roosevelt High".to_string(),
            zip_code: "10001".to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_returns_token_and_user() {
        let service = setup().await;
        let payload = service
            .signup(signup_input("new@example.com", UserRole::Mentee), "hunter22")
            .await
            .expect("Signup failed");

        assert!(payload.user.id > 0);
        assert!(!payload.token.is_empty());
        assert!(payload.user.subjects.is_empty());
    }

    #[tokio::test]
    async fn test_signup_duplicate_email_conflicts() {
        let service = setup().await;
        service
            .signup(signup_input("dup@example.com", UserRole::Mentee), "pw1")
            .await
            .expect("First signup should succeed");

        let result = service
            .signup(signup_input("dup@example.com", UserRole::Mentor), "pw2")
            .await;
        assert!(matches!(result, Err(ServiceError::Conflict(_))));

        // Directory still holds exactly one record
        let profile = service.get_profile("dup@example.com").await.unwrap();
        assert_eq!(profile.role, UserRole::Mentee);
    }

    #[tokio::test]
    async fn test_signup_missing_fields() {
        let service = setup().await;
        let mut input = signup_input("x@example.com", UserRole::Mentee);
        input.name = String::new();
        let result = service.signup(input, "pw").await;
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_login_success_and_failure_shapes() {
        let service = setup().await;
        service
            .signup(signup_input("login@example.com", UserRole::Both), "correct")
            .await
            .unwrap();

        let payload = service
            .login("login@example.com", "correct")
            .await
            .expect("Login should succeed");
        assert_eq!(payload.user.email, "login@example.com");

        let wrong_password = service.login("login@example.com", "incorrect").await;
        let unknown_email = service.login("ghost@example.com", "correct").await;
        assert!(matches!(wrong_password, Err(ServiceError::Unauthorized(_))));
        assert!(matches!(unknown_email, Err(ServiceError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_list_mentors_includes_both_role() {
        let service = setup().await;
        service
            .signup(signup_input("m1@example.com", UserRole::Mentor), "pw")
            .await
            .unwrap();
        service
            .signup(signup_input("b1@example.com", UserRole::Both), "pw")
            .await
            .unwrap();
        service
            .signup(signup_input("e1@example.com", UserRole::Mentee), "pw")
            .await
            .unwrap();

        let mentors = service.list_mentors().await.unwrap();
        assert_eq!(mentors.len(), 2);
        let mentees = service.list_mentees().await.unwrap();
        assert_eq!(mentees.len(), 2);
    }

    #[tokio::test]
    async fn test_update_profile_partial_and_password() {
        let service = setup().await;
        service
            .signup(signup_input("u@example.com", UserRole::Mentee), "old-password")
            .await
            .unwrap();

        let updated = service
            .update_profile(
                "u@example.com",
                UpdateUserInput {
                    grade: Some("12".to_string()),
                    password: Some("new-password".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("Update failed");
        assert_eq!(updated.grade, "12");
        assert_eq!(updated.name, "Jordan Lee");

        // Old password no longer works, new one does
        assert!(service.login("u@example.com", "old-password").await.is_err());
        assert!(service.login("u@example.com", "new-password").await.is_ok());
    }

    #[tokio::test]
    async fn test_update_profile_rejects_empty_update() {
        let service = setup().await;
        service
            .signup(signup_input("u2@example.com", UserRole::Mentee), "pw")
            .await
            .unwrap();

        let result = service
            .update_profile("u2@example.com", UpdateUserInput::default())
            .await;
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_update_profile_unknown_user() {
        let service = setup().await;
        let result = service
            .update_profile(
                "ghost@example.com",
                UpdateUserInput {
                    name: Some("Ghost".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_set_subjects_and_avatar() {
        let service = setup().await;
        service
            .signup(signup_input("s@example.com", UserRole::Mentor), "pw")
            .await
            .unwrap();

        service
            .set_subjects("s@example.com", vec!["Math".to_string(), "Physics".to_string()])
            .await
            .expect("Set subjects failed");
        let user = service
            .set_avatar_url("s@example.com", "http://localhost:8000/uploads/avatars/s.png")
            .await
            .expect("Set avatar failed");

        assert_eq!(user.subjects.len(), 2);
        assert!(user.profile_picture_url.is_some());

        let missing = service
            .set_subjects("ghost@example.com", vec!["Art".to_string()])
            .await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }
}
