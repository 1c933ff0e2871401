//! Database migrations
//!
//! Code-based migrations embedded in the binary for single-binary deployment.
//! Each logical collection from the data model gets one table; the two
//! list-valued fields (`subjects`, `time_slots`) are stored as JSON text.
//!
//! Applied versions are recorded in `_migrations` so startup is idempotent.

use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool};

/// A database migration.
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (unique and sequential)
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements to apply
    pub up: &'static str,
}

/// All migrations, in order.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_users",
        up: r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL UNIQUE,
                password_hash VARCHAR(255) NOT NULL,
                role VARCHAR(20) NOT NULL,
                grade VARCHAR(50) NOT NULL DEFAULT '',
                school VARCHAR(255) NOT NULL DEFAULT '',
                zip_code VARCHAR(20) NOT NULL DEFAULT '',
                subjects TEXT NOT NULL DEFAULT '[]',
                profile_picture_url VARCHAR(512),
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
            CREATE INDEX IF NOT EXISTS idx_users_role ON users(role);
        "#,
    },
    Migration {
        version: 2,
        name: "create_session_requests",
        up: r#"
            CREATE TABLE IF NOT EXISTS session_requests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                mentee_email VARCHAR(255) NOT NULL,
                mentor_email VARCHAR(255) NOT NULL,
                subject VARCHAR(255) NOT NULL,
                message TEXT NOT NULL DEFAULT '',
                scheduled_date VARCHAR(20),
                scheduled_time VARCHAR(50),
                status VARCHAR(20) NOT NULL DEFAULT 'pending',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_session_requests_mentee ON session_requests(mentee_email);
            CREATE INDEX IF NOT EXISTS idx_session_requests_mentor ON session_requests(mentor_email);
            CREATE INDEX IF NOT EXISTS idx_session_requests_status ON session_requests(status);
        "#,
    },
    Migration {
        version: 3,
        name: "create_notifications",
        up: r#"
            CREATE TABLE IF NOT EXISTS notifications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_email VARCHAR(255) NOT NULL,
                message TEXT NOT NULL,
                kind VARCHAR(50) NOT NULL,
                read BOOLEAN NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_email);
            CREATE INDEX IF NOT EXISTS idx_notifications_unread ON notifications(user_email, read);
        "#,
    },
    Migration {
        version: 4,
        name: "create_availability",
        up: r#"
            CREATE TABLE IF NOT EXISTS availability (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                mentor_email VARCHAR(255) NOT NULL,
                time_slots TEXT NOT NULL DEFAULT '[]',
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_availability_mentor ON availability(mentor_email);
        "#,
    },
];

/// Run all pending migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    create_migrations_table(pool).await?;

    let applied = applied_versions(pool).await?;

    for migration in MIGRATIONS {
        if applied.contains(&i64::from(migration.version)) {
            continue;
        }

        tracing::info!(
            "Applying migration {} ({})",
            migration.version,
            migration.name
        );

        // SQLite executes one statement per call, so split on ';'
        for statement in migration.up.split(';') {
            let statement = statement.trim();
            if statement.is_empty() {
                continue;
            }
            sqlx::query(statement)
                .execute(pool)
                .await
                .with_context(|| {
                    format!(
                        "Failed to apply migration {} ({})",
                        migration.version, migration.name
                    )
                })?;
        }

        sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
            .bind(i64::from(migration.version))
            .bind(migration.name)
            .execute(pool)
            .await
            .context("Failed to record migration")?;
    }

    Ok(())
}

async fn create_migrations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create migrations table")?;
    Ok(())
}

async fn applied_versions(pool: &SqlitePool) -> Result<Vec<i64>> {
    let rows = sqlx::query("SELECT version FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .context("Failed to read applied migrations")?;
    Ok(rows.iter().map(|row| row.get("version")).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    #[tokio::test]
    async fn test_migrations_create_all_tables() {
        let pool = create_test_pool().await.expect("Failed to create pool");
        run_migrations(&pool).await.expect("Migrations failed");

        for table in ["users", "session_requests", "notifications", "availability"] {
            let row = sqlx::query("SELECT COUNT(*) as count FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(table)
                .fetch_one(&pool)
                .await
                .expect("Query failed");
            let count: i64 = row.get("count");
            assert_eq!(count, 1, "table {} should exist", table);
        }
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = create_test_pool().await.expect("Failed to create pool");
        run_migrations(&pool).await.expect("First run failed");
        run_migrations(&pool).await.expect("Second run failed");

        let row = sqlx::query("SELECT COUNT(*) as count FROM _migrations")
            .fetch_one(&pool)
            .await
            .expect("Query failed");
        let count: i64 = row.get("count");
        assert_eq!(count, MIGRATIONS.len() as i64);
    }
}
