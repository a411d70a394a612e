use async_trait::async_trait;
use chrono::Utc;
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{Store, StoreError, TodoStore, UserStore, TODOS_USER_CONSTRAINT, USERS_EMAIL_CONSTRAINT};
use crate::models::{
    todo::{NewTodo, Todo, TodoChanges},
    user::{CreateUser, User},
};

/// In-memory store
///
/// Behaves like the PostgreSQL schema: ids come from a sequence starting at
/// 1, emails are unique case-insensitively, and a todo must reference an
/// existing user. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Tables>>,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    todos: BTreeMap<i64, Todo>,
    last_todo_id: i64,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Todo>, StoreError> {
        let tables = self.inner.lock().await;

        let mut todos: Vec<Todo> = tables
            .todos
            .values()
            .filter(|todo| todo.user_id == user_id)
            .cloned()
            .collect();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(todos)
    }

    async fn find_todo(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        Ok(self.inner.lock().await.todos.get(&id).cloned())
    }

    async fn insert_todo(&self, data: NewTodo) -> Result<Todo, StoreError> {
        let mut tables = self.inner.lock().await;

        if !tables.users.contains_key(&data.user_id) {
            return Err(StoreError::Conflict {
                constraint: TODOS_USER_CONSTRAINT.to_string(),
            });
        }

        tables.last_todo_id += 1;
        let todo = Todo {
            id: tables.last_todo_id,
            title: data.title,
            description: data.description,
            completed: false,
            user_id: data.user_id,
            created_at: Utc::now(),
        };
        tables.todos.insert(todo.id, todo.clone());

        Ok(todo)
    }

    async fn update_todo(&self, id: i64, changes: TodoChanges) -> Result<Option<Todo>, StoreError> {
        let mut tables = self.inner.lock().await;

        Ok(tables.todos.get_mut(&id).map(|todo| {
            changes.apply_to(todo);
            todo.clone()
        }))
    }

    async fn delete_todo(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.lock().await.todos.remove(&id).is_some())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError> {
        let mut tables = self.inner.lock().await;

        if tables
            .users
            .values()
            .any(|user| user.email.eq_ignore_ascii_case(&data.email))
        {
            return Err(StoreError::Conflict {
                constraint: USERS_EMAIL_CONSTRAINT.to_string(),
            });
        }

        let user = User {
            id: Uuid::new_v4(),
            email: data.email,
            name: data.name,
            password_hash: data.password_hash,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.lock().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .inner
            .lock()
            .await
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
