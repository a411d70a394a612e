/// Resource-level authorization
///
/// Every todo has exactly one owner for its lifetime. Only requests
/// authenticated as that owner may read, modify or delete it.

use super::middleware::AuthContext;
use crate::models::todo::Todo;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller does not own the resource
    #[error("Not authorized to access todo {todo_id}")]
    NotOwner { todo_id: i64 },
}

/// Checks whether the caller owns a todo
pub fn is_owner(todo: &Todo, auth: &AuthContext) -> bool {
    todo.user_id == auth.user_id
}

/// Requires the caller to own a todo
///
/// # Errors
///
/// Returns `AuthzError::NotOwner` if the todo belongs to another user
pub fn require_owner(todo: &Todo, auth: &AuthContext) -> Result<(), AuthzError> {
    if !is_owner(todo, auth) {
        return Err(AuthzError::NotOwner { todo_id: todo.id });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn todo_owned_by(user_id: Uuid) -> Todo {
        Todo {
            id: 7,
            title: "Buy milk".to_string(),
            description: None,
            completed: false,
            user_id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_passes() {
        let owner = Uuid::new_v4();
        let todo = todo_owned_by(owner);

        assert!(is_owner(&todo, &AuthContext::new(owner)));
        assert!(require_owner(&todo, &AuthContext::new(owner)).is_ok());
    }

    #[test]
    fn test_other_user_rejected() {
        let todo = todo_owned_by(Uuid::new_v4());
        let intruder = AuthContext::new(Uuid::new_v4());

        let err = require_owner(&todo, &intruder).unwrap_err();
        assert!(matches!(err, AuthzError::NotOwner { todo_id: 7 }));
        assert_eq!(err.to_string(), "Not authorized to access todo 7");
    }
}
