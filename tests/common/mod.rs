#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use dotenv::dotenv;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use todolist::auth::{SessionGuard, TokenCodec, TOKEN_COOKIE};
use todolist::config::Config;
use todolist::{db, routes};
use uuid::Uuid;

pub const SECRET: &str = "integration_test_secret";

pub fn test_config(database_url: &str) -> Config {
    Config {
        database_url: database_url.to_string(),
        database_max_connections: 5,
        jwt_secret: SECRET.to_string(),
        server_port: 0,
        server_host: "127.0.0.1".to_string(),
        cookie_secure: false,
    }
}

/// A pool that never connects unless a query is run. Used by tests whose requests
/// must be answered before any data access.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://postgres@127.0.0.1:5432/todolist_unused")
        .expect("valid connection string")
}

/// Connects to `DATABASE_URL` and applies migrations, or `None` when it is not set.
pub async fn database() -> Option<PgPool> {
    dotenv().ok();
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set; skipping database-backed test");
            return None;
        }
    };
    let pool = PgPool::connect(&url)
        .await
        .expect("Failed to connect to test DB");
    db::migrate(&pool).await.expect("Failed to run migrations");
    Some(pool)
}

pub async fn init_app(
    pool: PgPool,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(web::Data::new(pool))
            .app_data(web::Data::new(TokenCodec::new(SECRET)))
            .app_data(web::Data::new(test_config("postgres://unused")))
            .wrap(SessionGuard::new(TokenCodec::new(SECRET)))
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}_{}@example.com", prefix, Uuid::new_v4().simple())
}

pub fn session(token: &str) -> Cookie<'static> {
    Cookie::new(TOKEN_COOKIE, token.to_string())
}

pub async fn cleanup_user(pool: &PgPool, email: &str) {
    let _ = sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await;
}

/// Registers and logs in a user, returning the session token from the login cookie.
pub async fn register_and_login(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    email: &str,
    password: &str,
) -> String {
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": email, "name": "Test User", "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201, "registration of {} failed", email);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 200, "login of {} failed", email);

    resp.response()
        .cookies()
        .find(|c| c.name() == TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .expect("login should set the token cookie")
}

/// Sends a JSON request with the session cookie and returns status and body.
pub async fn send(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    req: test::TestRequest,
    token: &str,
) -> (actix_web::http::StatusCode, Value) {
    let resp = test::call_service(app, req.cookie(session(token)).to_request()).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}
