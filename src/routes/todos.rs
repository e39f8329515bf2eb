use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{TodoInput, TodoPatch},
    state::AppState,
    todos,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

/// Retrieves the authenticated user's todos.
///
/// Ordered newest first and capped at 100 entries.
///
/// ## Responses:
/// - `200 OK`: JSON array of todos.
/// - `401 Unauthorized`: missing or invalid bearer token.
#[get("")]
pub async fn list_todos(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl Responder, AppError> {
    let items = todos::list(state.todos.as_ref(), user.id).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// Creates a todo owned by the authenticated user. `completed` starts out false.
///
/// ## Responses:
/// - `200 OK`: the created todo.
/// - `400 Bad Request`: malformed JSON or missing title.
/// - `422 Unprocessable Entity`: title empty or too long, description too long.
#[post("")]
pub async fn create_todo(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    todo_data: web::Json<TodoInput>,
) -> Result<impl Responder, AppError> {
    let todo = todos::create(state.todos.as_ref(), user.id, todo_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(todo))
}

/// Applies a partial update to one of the user's todos.
///
/// The body may contain `title`, `description` and `completed`; any other key is a
/// 400. A todo owned by someone else is reported as 404, same as a missing one.
#[put("/{id}")]
pub async fn update_todo(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    todo_id: web::Path<Uuid>,
    patch: web::Json<TodoPatch>,
) -> Result<impl Responder, AppError> {
    let todo = todos::update(
        state.todos.as_ref(),
        user.id,
        todo_id.into_inner(),
        patch.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(todo))
}

#[delete("/{id}")]
pub async fn delete_todo(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    todo_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    if !todos::delete(state.todos.as_ref(), user.id, todo_id.into_inner()).await? {
        return Err(AppError::NotFound("Todo not found".into()));
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "Todo deleted successfully" })))
}
