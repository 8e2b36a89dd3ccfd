use crate::{
    auth::{
        hash_password, removal_cookie, session_cookie, verify_password, AuthResponse,
        LoginRequest, RegisterRequest, TokenCodec, TOKEN_COOKIE,
    },
    config::Config,
    db,
    error::AppError,
    models::PublicUser,
};
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

/// Register a new user
///
/// Creates an account with a bcrypt-hashed password. Does not log the user in.
///
/// ## Responses:
/// - `201 Created`: `{"message", "user": {id, email, name}}`.
/// - `400 Bad Request`: field-keyed validation errors.
/// - `409 Conflict`: the email is already registered.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let RegisterRequest {
        email,
        name,
        password,
    } = register_data.into_inner();

    if db::users::email_taken(&pool, &email).await? {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(&password)?;

    // Two concurrent registrations can both pass the check above; the unique index decides.
    let user = db::users::create(&pool, &email, &name, &password_hash)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict("Email already registered".into()),
            other => other,
        })?;

    log::info!("registered user {}", user.id);
    Ok(HttpResponse::Created().json(AuthResponse {
        message: "Registration successful".into(),
        user: PublicUser::from(user),
    }))
}

/// Login user
///
/// Checks the credentials and sets the HTTP-only `token` cookie.
/// An unknown email and a wrong password are answered identically.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    codec: web::Data<TokenCodec>,
    config: web::Data<Config>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = match db::users::find_by_email(&pool, &login_data.email).await? {
        Some(user) if verify_password(&login_data.password, &user.password_hash)? => user,
        _ => {
            log::warn!("rejected login attempt");
            return Err(AppError::Unauthorized("Invalid credentials".into()));
        }
    };

    let token = codec.issue(user.id, &user.email)?;
    log::info!("user {} logged in", user.id);

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token, config.cookie_secure))
        .json(AuthResponse {
            message: "Login successful".into(),
            user: PublicUser::from(user),
        }))
}

/// Logout user
///
/// Clears the `token` cookie. Succeeds whether or not a session existed.
#[post("/logout")]
pub async fn logout() -> impl Responder {
    HttpResponse::Ok()
        .cookie(removal_cookie())
        .json(json!({ "message": "Logged out" }))
}

/// Reports whether the request carries a valid session token.
///
/// ## Responses:
/// - `200 OK`: `{"valid": true}`.
/// - `401 Unauthorized`: `{"valid": false}`, for a missing, forged or expired token.
#[get("/verify")]
pub async fn verify(req: HttpRequest, codec: web::Data<TokenCodec>) -> impl Responder {
    let valid = req
        .cookie(TOKEN_COOKIE)
        .map(|cookie| codec.verify(cookie.value()).is_ok())
        .unwrap_or(false);

    if valid {
        HttpResponse::Ok().json(json!({ "valid": true }))
    } else {
        HttpResponse::Unauthorized().json(json!({ "valid": false }))
    }
}
