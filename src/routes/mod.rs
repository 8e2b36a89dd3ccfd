pub mod auth;
pub mod categories;
pub mod health;
pub mod pages;
pub mod todos;

use actix_web::web;

use crate::error::{json_error_handler, path_error_handler};

/// Registers every route of the service.
///
/// The JSON API lives under `/api`; the guarded pages and `/health` sit at the root.
/// Callers provide `web::Data<PgPool>`, `web::Data<TokenCodec>` and `web::Data<Config>`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(health::health)
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .service(auth::register)
                        .service(auth::login)
                        .service(auth::logout)
                        .service(auth::verify),
                )
                .service(
                    web::scope("/todos")
                        .service(todos::list_todos)
                        .service(todos::create_todo)
                        .service(todos::get_todo)
                        .service(todos::update_todo)
                        .service(todos::toggle_todo)
                        .service(todos::delete_todo),
                )
                .service(
                    web::scope("/categories")
                        .service(categories::list_categories)
                        .service(categories::create_category)
                        .service(categories::get_category)
                        .service(categories::update_category)
                        .service(categories::delete_category),
                ),
        )
        .configure(pages::config);
}
