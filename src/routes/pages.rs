//! Page routes behind the session guard.
//!
//! No HTML is rendered here; each page answers with a small JSON descriptor so
//! clients (and tests) can see what the guard let through.

use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{auth::AuthenticatedUser, db, error::AppError};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(login_page)
        .service(register_page)
        .service(dashboard_page)
        .service(todos_page)
        .service(todo_page)
        .service(categories_page);
}

#[get("/login")]
pub async fn login_page() -> impl Responder {
    HttpResponse::Ok().json(json!({ "page": "login" }))
}

#[get("/register")]
pub async fn register_page() -> impl Responder {
    HttpResponse::Ok().json(json!({ "page": "register" }))
}

#[get("/dashboard")]
pub async fn dashboard_page(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "page": "dashboard",
        "user": { "id": user.id, "email": user.email }
    }))
}

#[get("/todos")]
pub async fn todos_page(_user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(json!({ "page": "todos" }))
}

/// The todo is addressed by the id in the path, never by client-held state.
#[get("/todos/{id}")]
pub async fn todo_page(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    todo_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let todo = db::todos::find(&pool, todo_id.into_inner(), user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Todo not found".into()))?;
    Ok(HttpResponse::Ok().json(json!({ "page": "todo", "todo": todo })))
}

#[get("/categories")]
pub async fn categories_page(_user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(json!({ "page": "categories" }))
}
