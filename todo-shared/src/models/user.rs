/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email TEXT NOT NULL,
///     name VARCHAR(255),
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// CREATE UNIQUE INDEX users_email_key ON users (LOWER(email));
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// A user account
///
/// The password hash is never serialized, so a `User` can be returned to
/// clients as-is.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, unique case-insensitively
    pub email: String,

    /// Optional display name
    pub name: Option<String>,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Optional display name
    pub name: Option<String>,
}

impl User {
    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Fails with a unique constraint violation on `users_email_key` if the
    /// email is already registered.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, password_hash, created_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.name)
        .fetch_one(pool)
        .await
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a user by email address, ignoring case
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, created_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a user and, through the foreign key cascade, their todos
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
