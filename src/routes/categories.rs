use crate::{auth::AuthenticatedUser, db, error::AppError, models::CategoryInput};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const NOT_FOUND: &str = "Category not found";

/// Lists the caller's categories with the number of todos in each, newest first.
///
/// ## Responses:
/// - `200 OK`: `{"categories": [{id, name, userId, createdAt, todoCount}]}`.
/// - `401 Unauthorized`: no valid session cookie.
#[get("")]
pub async fn list_categories(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<impl Responder, AppError> {
    let categories = db::categories::list_for_user(&pool, user.id).await?;
    Ok(HttpResponse::Ok().json(json!({ "categories": categories })))
}

/// Creates a category owned by the caller.
#[post("")]
pub async fn create_category(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    category_data: web::Json<CategoryInput>,
) -> Result<impl Responder, AppError> {
    category_data.validate()?;
    let category = db::categories::create(&pool, user.id, &category_data.name).await?;

    log::info!("user {} created category {}", user.id, category.id);
    Ok(HttpResponse::Created().json(json!({ "category": category })))
}

#[get("/{id}")]
pub async fn get_category(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    category_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let category = db::categories::find(&pool, category_id.into_inner(), user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;
    Ok(HttpResponse::Ok().json(json!({ "category": category })))
}

/// Renames one of the caller's categories.
#[put("/{id}")]
pub async fn update_category(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    category_id: web::Path<Uuid>,
    category_data: web::Json<CategoryInput>,
) -> Result<impl Responder, AppError> {
    category_data.validate()?;
    let category = db::categories::rename(
        &pool,
        category_id.into_inner(),
        user.id,
        &category_data.name,
    )
    .await?
    .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;
    Ok(HttpResponse::Ok().json(json!({ "category": category })))
}

/// Deletes one of the caller's categories.
///
/// Todos filed under it are kept and end up without a category.
#[delete("/{id}")]
pub async fn delete_category(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    category_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let category_id = category_id.into_inner();
    if !db::categories::delete(&pool, category_id, user.id).await? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }

    log::info!("user {} deleted category {}", user.id, category_id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Category deleted successfully" })))
}
