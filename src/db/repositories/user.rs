//! User repository
//!
//! Database operations for the user directory. Provides the `UserRepository`
//! trait and its SQLite implementation. The `subjects` list is stored as a
//! JSON text column.

use crate::models::{User, UserRole};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

/// Partial update applied by the profile-update operation.
///
/// The password arrives here already hashed; hashing is the directory
/// service's job.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub grade: Option<String>,
    pub role: Option<UserRole>,
    pub password_hash: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.grade.is_none()
            && self.role.is_none()
            && self.password_hash.is_none()
    }
}

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, returning it with its assigned id
    async fn create(&self, user: &User) -> Result<User>;

    /// Look a user up by email
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;

    /// List all users whose role is in the given set
    async fn list_by_roles(&self, roles: &[UserRole]) -> Result<Vec<User>>;

    /// Apply a partial update; returns false when no row matched the email
    async fn update_fields(&self, email: &str, patch: &UserPatch) -> Result<bool>;

    /// Replace the subjects list wholesale; returns false when no row matched
    async fn set_subjects(&self, email: &str, subjects: &[String]) -> Result<bool>;

    /// Set the avatar URL; returns false when no row matched
    async fn set_avatar_url(&self, email: &str, url: &str) -> Result<bool>;

    /// Count all users
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based user repository implementation
pub struct SqlxUserRepository {
    pool: SqlitePool,
}

impl SqlxUserRepository {
    /// Create a new SQLx user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        let subjects_json =
            serde_json::to_string(&user.subjects).context("Failed to encode subjects")?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, role, grade, school, zip_code, subjects, profile_picture_url, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.to_string())
        .bind(&user.grade)
        .bind(&user.school)
        .bind(&user.zip_code)
        .bind(&subjects_json)
        .bind(&user.profile_picture_url)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create user")?;

        let mut created = user.clone();
        created.id = result.last_insert_rowid();
        Ok(created)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, role, grade, school, zip_code, subjects, profile_picture_url, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user by email")?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_by_roles(&self, roles: &[UserRole]) -> Result<Vec<User>> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; roles.len()].join(", ");
        let sql = format!(
            r#"
            SELECT id, name, email, password_hash, role, grade, school, zip_code, subjects, profile_picture_url, created_at
            FROM users
            WHERE role IN ({})
            ORDER BY created_at DESC
            "#,
            placeholders
        );

        let mut query = sqlx::query(&sql);
        for role in roles {
            query = query.bind(role.to_string());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list users by role")?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }

    async fn update_fields(&self, email: &str, patch: &UserPatch) -> Result<bool> {
        if patch.is_empty() {
            // Nothing to set; report whether the user exists at all
            return Ok(self.get_by_email(email).await?.is_some());
        }

        let mut sets = Vec::new();
        if patch.name.is_some() {
            sets.push("name = ?");
        }
        if patch.grade.is_some() {
            sets.push("grade = ?");
        }
        if patch.role.is_some() {
            sets.push("role = ?");
        }
        if patch.password_hash.is_some() {
            sets.push("password_hash = ?");
        }

        let sql = format!("UPDATE users SET {} WHERE email = ?", sets.join(", "));
        let mut query = sqlx::query(&sql);
        if let Some(name) = &patch.name {
            query = query.bind(name);
        }
        if let Some(grade) = &patch.grade {
            query = query.bind(grade);
        }
        if let Some(role) = &patch.role {
            query = query.bind(role.to_string());
        }
        if let Some(hash) = &patch.password_hash {
            query = query.bind(hash);
        }
        query = query.bind(email);

        let result = query
            .execute(&self.pool)
            .await
            .context("Failed to update user")?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_subjects(&self, email: &str, subjects: &[String]) -> Result<bool> {
        let subjects_json =
            serde_json::to_string(subjects).context("Failed to encode subjects")?;

        let result = sqlx::query("UPDATE users SET subjects = ? WHERE email = ?")
            .bind(&subjects_json)
            .bind(email)
            .execute(&self.pool)
            .await
            .context("Failed to update subjects")?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_avatar_url(&self, email: &str, url: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET profile_picture_url = ? WHERE email = ?")
            .bind(url)
            .bind(email)
            .execute(&self.pool)
            .await
            .context("Failed to update avatar URL")?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count users")?;
        Ok(row.get("count"))
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    let role_str: String = row.get("role");
    let role = UserRole::from_str(&role_str)
        .with_context(|| format!("Invalid role in database: {}", role_str))?;

    let subjects_json: String = row.get("subjects");
    let subjects: Vec<String> =
        serde_json::from_str(&subjects_json).context("Invalid subjects JSON in database")?;

    Ok(User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role,
        grade: row.get("grade"),
        school: row.get("school"),
        zip_code: row.get("zip_code"),
        subjects,
        profile_picture_url: row.get("profile_picture_url"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use crate::models::CreateUserInput;

    async fn setup_test_repo() -> SqlxUserRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxUserRepository::new(pool)
    }

    fn test_user(email: &str, role: UserRole) -> User {
        User::new(
            CreateUserInput {
                name: format!("User {}", email),
                email: email.to_string(),
                role,
                grade: "10".to_string(),
                school: "Lincoln High".to_string(),
                zip_code: "94110".to_string(),
            },
            "$argon2id$fake-hash".to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = setup_test_repo().await;
        let created = repo
            .create(&test_user("a@example.com", UserRole::Mentee))
            .await
            .expect("Failed to create user");
        assert!(created.id > 0);

        let found = repo
            .get_by_email("a@example.com")
            .await
            .expect("Failed to get user")
            .expect("User not found");
        assert_eq!(found.id, created.id);
        assert_eq!(found.role, UserRole::Mentee);
        assert!(found.subjects.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_email_not_found() {
        let repo = setup_test_repo().await;
        let found = repo
            .get_by_email("missing@example.com")
            .await
            .expect("Failed to query");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_unique_email_constraint() {
        let repo = setup_test_repo().await;
        repo.create(&test_user("dup@example.com", UserRole::Mentor))
            .await
            .expect("First insert should succeed");
        let result = repo.create(&test_user("dup@example.com", UserRole::Mentee)).await;
        assert!(result.is_err(), "Duplicate email should fail");

        let count = repo.count().await.expect("Failed to count");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_list_by_roles() {
        let repo = setup_test_repo().await;
        repo.create(&test_user("mentor@example.com", UserRole::Mentor))
            .await
            .unwrap();
        repo.create(&test_user("mentee@example.com", UserRole::Mentee))
            .await
            .unwrap();
        repo.create(&test_user("both@example.com", UserRole::Both))
            .await
            .unwrap();

        let mentors = repo
            .list_by_roles(&[UserRole::Mentor, UserRole::Both])
            .await
            .expect("Failed to list mentors");
        assert_eq!(mentors.len(), 2);
        assert!(mentors.iter().all(|u| u.is_mentor()));

        let none = repo.list_by_roles(&[]).await.expect("Empty role set");
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_update_fields_partial() {
        let repo = setup_test_repo().await;
        repo.create(&test_user("p@example.com", UserRole::Mentee))
            .await
            .unwrap();

        let matched = repo
            .update_fields(
                "p@example.com",
                &UserPatch {
                    grade: Some("11".to_string()),
                    role: Some(UserRole::Both),
                    ..Default::default()
                },
            )
            .await
            .expect("Update failed");
        assert!(matched);

        let user = repo.get_by_email("p@example.com").await.unwrap().unwrap();
        assert_eq!(user.grade, "11");
        assert_eq!(user.role, UserRole::Both);
        // Untouched fields survive
        assert_eq!(user.name, "User p@example.com");
    }

    #[tokio::test]
    async fn test_update_fields_no_match() {
        let repo = setup_test_repo().await;
        let matched = repo
            .update_fields(
                "missing@example.com",
                &UserPatch {
                    name: Some("New Name".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("Update failed");
        assert!(!matched);
    }

    #[tokio::test]
    async fn test_set_subjects_replaces_wholesale() {
        let repo = setup_test_repo().await;
        repo.create(&test_user("s@example.com", UserRole::Mentor))
            .await
            .unwrap();

        repo.set_subjects("s@example.com", &["Math".to_string(), "Physics".to_string()])
            .await
            .expect("Set failed");
        repo.set_subjects("s@example.com", &["Chemistry".to_string()])
            .await
            .expect("Set failed");

        let user = repo.get_by_email("s@example.com").await.unwrap().unwrap();
        assert_eq!(user.subjects, vec!["Chemistry".to_string()]);
    }

    #[tokio::test]
    async fn test_set_avatar_url() {
        let repo = setup_test_repo().await;
        repo.create(&test_user("av@example.com", UserRole::Mentee))
            .await
            .unwrap();

        let matched = repo
            .set_avatar_url("av@example.com", "http://localhost:8000/uploads/avatars/av@example.com.png")
            .await
            .expect("Set failed");
        assert!(matched);

        let user = repo.get_by_email("av@example.com").await.unwrap().unwrap();
        assert_eq!(
            user.profile_picture_url.as_deref(),
            Some("http://localhost:8000/uploads/avatars/av@example.com.png")
        );
    }
}
