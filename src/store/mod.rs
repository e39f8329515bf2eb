//! Persistence for users and todos.
//!
//! Handlers never see a concrete backend: they receive `Arc<dyn UserStore>` and
//! `Arc<dyn TodoStore>` through [`crate::state::AppState`]. Every todo mutation is
//! filtered on both the todo id and the owner id, so one user cannot reach another
//! user's rows through any method here.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Todo, TodoPatch, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Database used when the connection string does not name one.
pub const DEFAULT_DATABASE_NAME: &str = "todoapp";

/// Connection strings with this scheme select [`MemoryStore`].
pub const MEMORY_SCHEME: &str = "memory://";

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    /// The store could not be reached. Fatal when raised at startup.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("Store error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new user, failing with [`StoreError::DuplicateEmail`] if the email
    /// is already taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;
    /// Exact, case-sensitive match on the stored email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn insert_todo(&self, todo: &Todo) -> Result<(), StoreError>;
    /// Todos owned by `user_id`, newest first, at most `limit` of them.
    async fn list_todos(&self, user_id: Uuid, limit: usize) -> Result<Vec<Todo>, StoreError>;
    /// Applies `patch` to the todo matching both ids and returns the updated record,
    /// or `None` if no such todo exists for this owner.
    async fn update_todo(
        &self,
        user_id: Uuid,
        todo_id: Uuid,
        patch: &TodoPatch,
    ) -> Result<Option<Todo>, StoreError>;
    /// Returns whether a record was actually removed.
    async fn delete_todo(&self, user_id: Uuid, todo_id: Uuid) -> Result<bool, StoreError>;
}

/// Picks the database name out of a connection string: the trailing path segment,
/// without any query string, or [`DEFAULT_DATABASE_NAME`] when there is none.
pub fn database_name(url: &str) -> &str {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = match without_scheme.split_once('/') {
        Some((_authority, path)) => path,
        None => return DEFAULT_DATABASE_NAME,
    };
    let name = path
        .split('?')
        .next()
        .unwrap_or_default()
        .rsplit('/')
        .next()
        .unwrap_or_default();

    if name.is_empty() {
        DEFAULT_DATABASE_NAME
    } else {
        name
    }
}
