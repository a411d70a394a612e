/// Todo resource endpoints
///
/// All routes require authentication; handlers pass the caller's
/// `AuthContext` and the store into `todo_shared::service`, which enforces
/// ownership.
///
/// # Endpoints
///
/// - `GET /todos` - List the caller's todos, newest first
/// - `POST /todos` - Create a todo (201)
/// - `PUT /todos/:id` - Partial update
/// - `DELETE /todos/:id` - Delete permanently
///
/// # Partial updates
///
/// `PUT` bodies carry any subset of `title`, `description` and `completed`.
/// Omitted keys keep their value. `"description": null` clears the
/// description; `null` for `title` or `completed` is rejected.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use todo_shared::{
    auth::middleware::AuthContext,
    models::todo::{Todo, TodoChanges},
    service,
};

/// Create request
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    /// Required, trimmed by the service
    pub title: Option<String>,

    /// Optional description
    pub description: Option<String>,
}

/// Update request
///
/// The outer `Option` records whether the key was present at all, the inner
/// one whether it was `null`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    pub completed: Option<Option<bool>>,
}

/// Marks a key as present, keeping `null` distinguishable from absent
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl TryFrom<UpdateTodoRequest> for TodoChanges {
    type Error = ApiError;

    fn try_from(req: UpdateTodoRequest) -> Result<Self, Self::Error> {
        let title = match req.title {
            Some(None) => return Err(ApiError::field("title", "Title must be a string")),
            other => other.flatten(),
        };
        let completed = match req.completed {
            Some(None) => return Err(ApiError::field("completed", "Completed must be a boolean")),
            other => other.flatten(),
        };

        Ok(TodoChanges {
            title,
            description: req.description,
            completed,
        })
    }
}

impl UpdateTodoRequest {
    /// Parses a body that must be a JSON object
    ///
    /// Sequences would otherwise deserialize into the struct positionally.
    pub fn from_json(body: Value) -> Result<Self, ApiError> {
        if !body.is_object() {
            return Err(ApiError::BadRequest(
                "Request body must be a JSON object".to_string(),
            ));
        }

        serde_json::from_value(body).map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

/// Delete acknowledgment
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Lists the caller's todos
pub async fn list_todos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Todo>>> {
    let todos = service::list(state.store.as_ref(), &auth).await?;
    Ok(Json(todos))
}

/// Creates a todo owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: Missing or blank title, malformed body
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let Json(req) = payload?;

    let todo = service::create(state.store.as_ref(), &auth, req.title, req.description).await?;

    Ok((StatusCode::CREATED, Json(todo)))
}

/// Applies a partial update to one of the caller's todos
///
/// # Errors
///
/// - `400 Bad Request`: Invalid body or field values
/// - `403 Forbidden`: Todo belongs to another user
/// - `404 Not Found`: No todo with this id
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Todo>> {
    let Path(id) = id?;
    let Json(body) = payload?;
    let changes = TodoChanges::try_from(UpdateTodoRequest::from_json(body)?)?;

    let todo = service::update(state.store.as_ref(), &auth, id, changes).await?;

    Ok(Json(todo))
}

/// Deletes one of the caller's todos
///
/// # Errors
///
/// - `403 Forbidden`: Todo belongs to another user
/// - `404 Not Found`: No todo with this id
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<DeleteResponse>> {
    let Path(id) = id?;

    service::delete(state.store.as_ref(), &auth, id).await?;

    Ok(Json(DeleteResponse {
        message: "Todo deleted successfully".to_string(),
    }))
}
