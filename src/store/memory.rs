use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, TodoStore, UserStore};
use crate::models::{Todo, TodoPatch, User};

/// Process-local store backed by maps behind `tokio` read/write locks.
///
/// Cloning shares the underlying data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    // Kept in insertion order so that todos created within the same clock tick still
    // list newest-first.
    todos: Arc<RwLock<Vec<Todo>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        users.insert(user.id, user.clone());
        log::debug!("User {} saved to memory store", user.id);
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn insert_todo(&self, todo: &Todo) -> Result<(), StoreError> {
        let mut todos = self.todos.write().await;
        if todos.iter().any(|existing| existing.id == todo.id) {
            return Err(StoreError::Backend(format!("Todo {} already exists", todo.id)));
        }
        todos.push(todo.clone());
        Ok(())
    }

    async fn list_todos(&self, user_id: Uuid, limit: usize) -> Result<Vec<Todo>, StoreError> {
        let todos = self.todos.read().await;
        let mut owned: Vec<Todo> = todos
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        // Stable sort keeps reverse insertion order among equal timestamps.
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        owned.truncate(limit);
        Ok(owned)
    }

    async fn update_todo(
        &self,
        user_id: Uuid,
        todo_id: Uuid,
        patch: &TodoPatch,
    ) -> Result<Option<Todo>, StoreError> {
        let mut todos = self.todos.write().await;
        Ok(todos
            .iter_mut()
            .find(|t| t.id == todo_id && t.user_id == user_id)
            .map(|todo| {
                todo.apply(patch);
                todo.clone()
            }))
    }

    async fn delete_todo(&self, user_id: Uuid, todo_id: Uuid) -> Result<bool, StoreError> {
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|t| !(t.id == todo_id && t.user_id == user_id));
        Ok(todos.len() < before)
    }
}
