/// Todo resource operations
///
/// Every operation takes the caller's [`AuthContext`] and a store handle as
/// explicit arguments. Ownership rules:
///
/// - `list` only ever returns the caller's own todos.
/// - `update` and `delete` check existence first (`NotFound`), then
///   ownership (`Forbidden`), and only then write. Ids that exist but belong
///   to someone else therefore answer 403, unknown ids answer 404.
/// - Validation of the request runs before any store access, so a rejected
///   request never mutates anything.
///
/// # Example
///
/// ```
/// use todo_shared::{auth::middleware::AuthContext, models::user::CreateUser, service};
/// use todo_shared::store::{MemoryStore, UserStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let user = store
///     .create_user(CreateUser {
///         email: "ada@example.com".to_string(),
///         password_hash: "hash".to_string(),
///         name: None,
///     })
///     .await?;
/// let auth = AuthContext::new(user.id);
///
/// let todo = service::create(&store, &auth, Some("  Buy milk ".to_string()), None).await?;
/// assert_eq!(todo.title, "Buy milk");
/// assert_eq!(service::list(&store, &auth).await?.len(), 1);
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    auth::{
        authorization::{require_owner, AuthzError},
        middleware::AuthContext,
    },
    models::todo::{NewTodo, Todo, TodoChanges},
    store::{StoreError, TodoStore},
};

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name as it appears in the request body
    pub field: String,

    /// Human-readable message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error type for todo operations
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    /// Request input is malformed or missing
    #[error("Validation failed: {} errors", .0.len())]
    Validation(Vec<FieldError>),

    /// No todo with the requested id exists
    #[error("Todo {0} not found")]
    NotFound(i64),

    /// The todo exists but belongs to another user
    #[error(transparent)]
    Forbidden(#[from] AuthzError),

    /// Persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Trims a title and rejects it when nothing is left
fn normalize_title(title: &str, message: &str) -> Result<String, FieldError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new("title", message));
    }
    Ok(trimmed.to_string())
}

/// Lists the caller's todos, newest first
pub async fn list<S>(store: &S, auth: &AuthContext) -> Result<Vec<Todo>, TodoError>
where
    S: TodoStore + ?Sized,
{
    let todos = store.list_for_user(auth.user_id).await?;
    debug!(user_id = %auth.user_id, count = todos.len(), "Listed todos");
    Ok(todos)
}

/// Creates a todo owned by the caller
///
/// `title` is required and must be non-empty after trimming; `description`
/// is trimmed when present. The new todo starts with `completed = false`.
///
/// # Errors
///
/// `TodoError::Validation` if the title is missing or blank; nothing is
/// persisted in that case.
pub async fn create<S>(
    store: &S,
    auth: &AuthContext,
    title: Option<String>,
    description: Option<String>,
) -> Result<Todo, TodoError>
where
    S: TodoStore + ?Sized,
{
    let title = normalize_title(title.as_deref().unwrap_or_default(), "Title is required")
        .map_err(|e| TodoError::Validation(vec![e]))?;
    let description = description.map(|d| d.trim().to_string());

    let todo = store
        .insert_todo(NewTodo {
            user_id: auth.user_id,
            title,
            description,
        })
        .await?;

    info!(todo_id = todo.id, user_id = %auth.user_id, "Todo created");
    Ok(todo)
}

/// Fetches a todo and checks the caller owns it
///
/// Existence is checked before ownership.
async fn find_owned<S>(store: &S, auth: &AuthContext, id: i64) -> Result<Todo, TodoError>
where
    S: TodoStore + ?Sized,
{
    let todo = store.find_todo(id).await?.ok_or(TodoError::NotFound(id))?;

    require_owner(&todo, auth).map_err(|e| {
        warn!(todo_id = id, user_id = %auth.user_id, "Rejected access to another user's todo");
        e
    })?;

    Ok(todo)
}

/// Applies a partial update to one of the caller's todos
///
/// Only fields present in `changes` are written. A present title is trimmed
/// and must be non-empty; a present description is trimmed, and
/// `Some(None)` clears it.
///
/// # Errors
///
/// - `Validation` if a present title is blank
/// - `NotFound` if no todo has this id
/// - `Forbidden` if the todo belongs to another user
pub async fn update<S>(
    store: &S,
    auth: &AuthContext,
    id: i64,
    changes: TodoChanges,
) -> Result<Todo, TodoError>
where
    S: TodoStore + ?Sized,
{
    let changes = TodoChanges {
        title: changes
            .title
            .map(|t| normalize_title(&t, "Title cannot be empty"))
            .transpose()
            .map_err(|e| TodoError::Validation(vec![e]))?,
        description: changes
            .description
            .map(|d| d.map(|d| d.trim().to_string())),
        completed: changes.completed,
    };

    find_owned(store, auth, id).await?;

    // The row can vanish between the ownership check and the write
    let todo = store
        .update_todo(id, changes)
        .await?
        .ok_or(TodoError::NotFound(id))?;

    info!(todo_id = id, user_id = %auth.user_id, "Todo updated");
    Ok(todo)
}

/// Permanently deletes one of the caller's todos
///
/// # Errors
///
/// - `NotFound` if no todo has this id
/// - `Forbidden` if the todo belongs to another user
pub async fn delete<S>(store: &S, auth: &AuthContext, id: i64) -> Result<(), TodoError>
where
    S: TodoStore + ?Sized,
{
    find_owned(store, auth, id).await?;

    if !store.delete_todo(id).await? {
        return Err(TodoError::NotFound(id));
    }

    info!(todo_id = id, user_id = %auth.user_id, "Todo deleted");
    Ok(())
}
