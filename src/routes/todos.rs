use crate::{
    auth::AuthenticatedUser,
    db,
    error::AppError,
    models::{TodoChanges, TodoInput, ToggleInput},
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

const NOT_FOUND: &str = "Todo not found";

/// Validates a todo body and checks that its category, if any, is one of the caller's.
async fn checked_changes(
    pool: &PgPool,
    user: &AuthenticatedUser,
    input: TodoInput,
) -> Result<TodoChanges, AppError> {
    let changes = input.into_changes()?;
    if let Some(category_id) = changes.category_id {
        if !db::categories::exists(pool, category_id, user.id).await? {
            return Err(AppError::invalid_field("categoryId", "Category not found"));
        }
    }
    Ok(changes)
}

/// Lists the caller's todos.
///
/// Each todo carries its `category` as `{id, name}` (or `null`).
/// Todos are ordered by creation date, newest first.
///
/// ## Responses:
/// - `200 OK`: a JSON array of todos.
/// - `401 Unauthorized`: no valid session cookie.
#[get("")]
pub async fn list_todos(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<impl Responder, AppError> {
    let todos = db::todos::list_for_user(&pool, user.id).await?;
    Ok(HttpResponse::Ok().json(todos))
}

/// Creates a todo owned by the caller.
///
/// The owner always comes from the session; any owner field in the body is ignored.
///
/// ## Request Body:
/// - `title` (required, 1-200 characters)
/// - `description` (optional)
/// - `priority`: one of `low`, `medium`, `high`
/// - `dueDate` (optional): `YYYY-MM-DD` or RFC 3339
/// - `categoryId` (optional): one of the caller's categories
///
/// ## Responses:
/// - `201 Created`: the new todo.
/// - `400 Bad Request`: field-keyed validation errors.
/// - `401 Unauthorized`: no valid session cookie.
#[post("")]
pub async fn create_todo(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    todo_data: web::Json<TodoInput>,
) -> Result<impl Responder, AppError> {
    let changes = checked_changes(&pool, &user, todo_data.into_inner()).await?;
    let todo = db::todos::create(&pool, user.id, &changes).await?;

    log::info!("user {} created todo {}", user.id, todo.id);
    Ok(HttpResponse::Created().json(todo))
}

/// Retrieves one of the caller's todos.
///
/// ## Responses:
/// - `200 OK`: the todo.
/// - `401 Unauthorized`: no valid session cookie.
/// - `404 Not Found`: no such todo, or it belongs to another user.
#[get("/{id}")]
pub async fn get_todo(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    todo_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let todo = db::todos::find(&pool, todo_id.into_inner(), user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;
    Ok(HttpResponse::Ok().json(todo))
}

/// Replaces all mutable fields of one of the caller's todos.
///
/// Takes the same body as `create_todo`. `completed` is left untouched.
#[put("/{id}")]
pub async fn update_todo(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    todo_id: web::Path<Uuid>,
    todo_data: web::Json<TodoInput>,
) -> Result<impl Responder, AppError> {
    let changes = checked_changes(&pool, &user, todo_data.into_inner()).await?;
    let todo = db::todos::update(&pool, todo_id.into_inner(), user.id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;

    log::info!("user {} updated todo {}", user.id, todo.id);
    Ok(HttpResponse::Ok().json(todo))
}

/// Sets the `completed` flag of one of the caller's todos.
///
/// ## Request Body:
/// `{"completed": true | false}`. Sending the same value twice leaves the todo as it is.
#[patch("/{id}")]
pub async fn toggle_todo(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    todo_id: web::Path<Uuid>,
    toggle: web::Json<ToggleInput>,
) -> Result<impl Responder, AppError> {
    let todo = db::todos::set_completed(&pool, todo_id.into_inner(), user.id, toggle.completed)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;
    Ok(HttpResponse::Ok().json(todo))
}

/// Deletes one of the caller's todos.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Todo deleted successfully"}`.
/// - `401 Unauthorized`: no valid session cookie.
/// - `404 Not Found`: no such todo, or it belongs to another user.
#[delete("/{id}")]
pub async fn delete_todo(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    todo_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let todo_id = todo_id.into_inner();
    if !db::todos::delete(&pool, todo_id, user.id).await? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }

    log::info!("user {} deleted todo {}", user.id, todo_id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Todo deleted successfully" })))
}
