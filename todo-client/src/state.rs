/// Local todo list kept in step with the server
///
/// Every operation waits for the server before touching the local list:
///
/// - `refresh` replaces the list with the server's
/// - `add` prepends the created todo; blank titles are ignored without a request
/// - `toggle` sends the flipped `completed` flag and swaps in the returned todo
/// - `remove` drops the todo by id
///
/// A failure leaves the list unchanged and sets [`TodoListState::error`] to
/// a short message; the next success clears it.

use crate::{
    client::TodoClient,
    error::ClientError,
    types::{NewTodo, Todo, TodoPatch},
};

pub const FETCH_FAILED: &str = "Failed to fetch todos";
pub const ADD_FAILED: &str = "Failed to add todo";
pub const UPDATE_FAILED: &str = "Failed to update todo";
pub const DELETE_FAILED: &str = "Failed to delete todo";

/// Todo list plus the last user-facing error
#[derive(Debug, Clone)]
pub struct TodoListState {
    client: TodoClient,
    todos: Vec<Todo>,
    error: Option<String>,
}

impl TodoListState {
    /// Empty list; call [`refresh`](Self::refresh) to load
    pub fn new(client: TodoClient) -> Self {
        Self {
            client,
            todos: Vec::new(),
            error: None,
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Message from the last failed operation, if it hasn't been cleared
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn get(&self, id: i64) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    fn settle<T>(&mut self, result: Result<T, ClientError>, message: &str) -> Result<T, ClientError> {
        match &result {
            Ok(_) => self.error = None,
            Err(e) => {
                tracing::warn!(error = %e, "{}", message);
                self.error = Some(message.to_string());
            }
        }
        result
    }

    /// Replaces the list with the server's
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let result = self.client.list().await;
        let todos = self.settle(result, FETCH_FAILED)?;
        self.todos = todos;
        Ok(())
    }

    /// Creates a todo and puts it at the front of the list
    ///
    /// Returns `Ok(None)` without contacting the server when `title` is blank.
    pub async fn add(
        &mut self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Option<Todo>, ClientError> {
        if title.trim().is_empty() {
            return Ok(None);
        }

        let new_todo = NewTodo {
            title: title.to_string(),
            description: description.map(str::to_string),
        };
        let result = self.client.create(&new_todo).await;
        let todo = self.settle(result, ADD_FAILED)?;

        self.todos.insert(0, todo.clone());
        Ok(Some(todo))
    }

    /// Flips `completed` given its current value
    ///
    /// The entry with the same id is replaced by the server's response.
    pub async fn toggle(&mut self, id: i64, completed: bool) -> Result<Todo, ClientError> {
        let result = self.client.update(id, &TodoPatch::completed(!completed)).await;
        let updated = self.settle(result, UPDATE_FAILED)?;

        for todo in self.todos.iter_mut().filter(|todo| todo.id == id) {
            *todo = updated.clone();
        }
        Ok(updated)
    }

    /// Deletes a todo and drops it from the list
    pub async fn remove(&mut self, id: i64) -> Result<(), ClientError> {
        let result = self.client.delete(id).await;
        self.settle(result, DELETE_FAILED)?;

        self.todos.retain(|todo| todo.id != id);
        Ok(())
    }
}
