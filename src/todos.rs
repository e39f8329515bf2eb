//! Per-user todo operations. Every call is scoped by the owner's id; a todo that
//! exists but belongs to someone else is indistinguishable from one that does not.

use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{Todo, TodoInput, TodoPatch};
use crate::store::TodoStore;

/// Maximum number of todos returned by [`list`].
pub const LIST_LIMIT: usize = 100;

pub async fn create(
    store: &dyn TodoStore,
    user_id: Uuid,
    input: TodoInput,
) -> Result<Todo, AppError> {
    input.validate()?;
    let todo = Todo::new(input, user_id);
    store.insert_todo(&todo).await?;
    log::info!("User {} created todo {}", user_id, todo.id);
    Ok(todo)
}

/// Newest first, capped at [`LIST_LIMIT`].
pub async fn list(store: &dyn TodoStore, user_id: Uuid) -> Result<Vec<Todo>, AppError> {
    Ok(store.list_todos(user_id, LIST_LIMIT).await?)
}

pub async fn update(
    store: &dyn TodoStore,
    user_id: Uuid,
    todo_id: Uuid,
    patch: TodoPatch,
) -> Result<Todo, AppError> {
    patch.validate()?;
    store
        .update_todo(user_id, todo_id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Todo not found".into()))
}

/// Returns whether a todo was actually removed.
pub async fn delete(
    store: &dyn TodoStore,
    user_id: Uuid,
    todo_id: Uuid,
) -> Result<bool, AppError> {
    let deleted = store.delete_todo(user_id, todo_id).await?;
    if deleted {
        log::info!("User {} deleted todo {}", user_id, todo_id);
    }
    Ok(deleted)
}
