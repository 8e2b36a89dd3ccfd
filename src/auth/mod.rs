pub mod cookie;
pub mod extractors;
pub mod guard;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::PublicUser;

// Re-export necessary items
pub use cookie::{removal_cookie, session_cookie, TOKEN_COOKIE};
pub use extractors::AuthenticatedUser;
pub use middleware::SessionGuard;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenCodec};

/// Represents the payload for a user login request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
///
/// Absent fields deserialize as empty strings so validation names them.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login identifier; must be unique across users.
    #[serde(default)]
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    /// Display name.
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Must be at least 6 characters long.
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Response body after a successful registration or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: PublicUser,
}
