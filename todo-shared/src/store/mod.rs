/// Persistence handles
///
/// The API receives a store as an explicit value (`Arc<dyn Store>`) rather
/// than reaching for a process-wide client, so tests can swap PostgreSQL for
/// the in-memory implementation.
///
/// - [`PgStore`]: PostgreSQL via sqlx
/// - [`MemoryStore`]: in-process maps, for tests and database-less runs

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    todo::{NewTodo, Todo, TodoChanges},
    user::{CreateUser, User},
};

/// Constraint name PostgreSQL assigns to the unique email column
pub const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";

/// Foreign key from `todos.user_id` to `users.id`
pub const TODOS_USER_CONSTRAINT: &str = "todos_user_id_fkey";

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique or foreign key constraint rejected the write
    #[error("Constraint violation: {constraint}")]
    Conflict { constraint: String },

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    /// True when the conflict is a duplicate email address
    pub fn is_duplicate_email(&self) -> bool {
        matches!(self, StoreError::Conflict { constraint } if constraint == USERS_EMAIL_CONSTRAINT)
    }

    /// True when a todo was written for a user that does not exist
    pub fn is_missing_owner(&self) -> bool {
        matches!(self, StoreError::Conflict { constraint } if constraint == TODOS_USER_CONSTRAINT)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if let Some(constraint) = db_err.constraint() {
                return StoreError::Conflict {
                    constraint: constraint.to_string(),
                };
            }
        }
        StoreError::Database(err)
    }
}

/// Todo persistence
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All todos owned by `user_id`, newest first (ties: higher id first)
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Todo>, StoreError>;

    /// A todo by id, regardless of owner
    async fn find_todo(&self, id: i64) -> Result<Option<Todo>, StoreError>;

    /// Inserts a todo with `completed = false`, assigning id and timestamp
    async fn insert_todo(&self, data: NewTodo) -> Result<Todo, StoreError>;

    /// Writes only the fields present in `changes`; None if the id is gone
    async fn update_todo(&self, id: i64, changes: TodoChanges) -> Result<Option<Todo>, StoreError>;

    /// Permanently removes a todo; false if the id is gone
    async fn delete_todo(&self, id: i64) -> Result<bool, StoreError>;
}

/// User persistence
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user; `Conflict` on a duplicate email
    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError>;

    /// A user by id
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// A user by email, compared case-insensitively
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// Everything the API needs from persistence
#[async_trait]
pub trait Store: TodoStore + UserStore {
    /// Short name for logs and the health endpoint
    fn backend(&self) -> &'static str;

    /// Verifies the backend is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}
