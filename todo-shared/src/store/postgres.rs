use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreError, TodoStore, UserStore};
use crate::{
    db::pool::health_check,
    models::{
        todo::{NewTodo, Todo, TodoChanges},
        user::{CreateUser, User},
    },
};

/// PostgreSQL-backed store
///
/// Cloning is cheap; the pool is reference counted.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Todo>, StoreError> {
        Ok(Todo::list_by_user(&self.pool, user_id).await?)
    }

    async fn find_todo(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        Ok(Todo::find_by_id(&self.pool, id).await?)
    }

    async fn insert_todo(&self, data: NewTodo) -> Result<Todo, StoreError> {
        Ok(Todo::create(&self.pool, data).await?)
    }

    async fn update_todo(&self, id: i64, changes: TodoChanges) -> Result<Option<Todo>, StoreError> {
        Ok(Todo::update(&self.pool, id, changes).await?)
    }

    async fn delete_todo(&self, id: i64) -> Result<bool, StoreError> {
        Ok(Todo::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(health_check(&self.pool).await?)
    }
}
