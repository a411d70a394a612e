/// Todo model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE todos (
///     id BIGSERIAL PRIMARY KEY,
///     title TEXT NOT NULL,
///     description TEXT,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `id`, `user_id` and `created_at` are set once at insert and never
/// written again; updates only ever touch `title`, `description` and
/// `completed`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const COLUMNS: &str = "id, title, description, completed, user_id, created_at";

/// A todo item owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Store-assigned ID
    pub id: i64,

    /// Non-empty, trimmed title
    pub title: String,

    /// Optional description; `None` means "not set", distinct from `""`
    pub description: Option<String>,

    /// Completion flag, false at creation
    pub completed: bool,

    /// Owning user
    pub user_id: Uuid,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Input for inserting a todo
///
/// Values are stored as given; trimming and validation happen in the
/// service layer.
#[derive(Debug, Clone)]
pub struct NewTodo {
    /// Owning user
    pub user_id: Uuid,

    /// Title
    pub title: String,

    /// Optional description
    pub description: Option<String>,
}

/// Field update set for a partial update
///
/// Only `Some` fields are written. `description: Some(None)` clears the
/// description; `description: None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoChanges {
    /// New title
    pub title: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,

    /// New completion flag
    pub completed: Option<bool>,
}

impl TodoChanges {
    /// True when no field is present
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    /// Applies the present fields to `todo` in place
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(description) = &self.description {
            todo.description = description.clone();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }
}

impl Todo {
    /// Inserts a new todo with `completed = false`
    pub async fn create(pool: &PgPool, data: NewTodo) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO todos (title, description, user_id) VALUES ($1, $2, $3) RETURNING {}",
            COLUMNS
        );

        sqlx::query_as::<_, Todo>(&query)
            .bind(data.title)
            .bind(data.description)
            .bind(data.user_id)
            .fetch_one(pool)
            .await
    }

    /// Finds a todo by ID regardless of owner
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM todos WHERE id = $1", COLUMNS);

        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists a user's todos, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM todos WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            COLUMNS
        );

        sqlx::query_as::<_, Todo>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Applies a partial update
    ///
    /// Only the columns present in `changes` appear in the `SET` clause. An
    /// empty change set performs no write and returns the current row.
    ///
    /// # Returns
    ///
    /// The updated todo, or None if it doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: i64,
        changes: TodoChanges,
    ) -> Result<Option<Self>, sqlx::Error> {
        if changes.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        // $1 is the id; present fields take $2, $3, ... in order
        let mut assignments = Vec::with_capacity(3);
        let mut bind_count = 1;

        if changes.title.is_some() {
            bind_count += 1;
            assignments.push(format!("title = ${}", bind_count));
        }
        if changes.description.is_some() {
            bind_count += 1;
            assignments.push(format!("description = ${}", bind_count));
        }
        if changes.completed.is_some() {
            bind_count += 1;
            assignments.push(format!("completed = ${}", bind_count));
        }

        let query = format!(
            "UPDATE todos SET {} WHERE id = $1 RETURNING {}",
            assignments.join(", "),
            COLUMNS
        );

        let mut q = sqlx::query_as::<_, Todo>(&query).bind(id);

        if let Some(title) = changes.title {
            q = q.bind(title);
        }
        if let Some(description) = changes.description {
            q = q.bind(description);
        }
        if let Some(completed) = changes.completed {
            q = q.bind(completed);
        }

        q.fetch_optional(pool).await
    }

    /// Permanently deletes a todo
    ///
    /// # Returns
    ///
    /// True if a row was deleted
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
