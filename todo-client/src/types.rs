/// Wire types shared with the API
///
/// Field names follow the server's camelCase JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A todo as returned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Account details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Register/login response
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Body for `POST /todos`
#[derive(Debug, Clone, Serialize)]
pub struct NewTodo {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body for `PUT /todos/:id`
///
/// `None` fields are left out of the JSON. `description: Some(None)` is sent
/// as `null`, which clears it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Patch that only sets `completed`
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }
}

/// Error body the API sends with non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}
