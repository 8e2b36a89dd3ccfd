use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::cookie::TOKEN_COOKIE;
use crate::auth::token::TokenCodec;
use crate::error::AppError;

/// The caller, as resolved from the `token` cookie of the current request.
///
/// Every API handler takes this as its first argument, so a request without a
/// usable session is rejected with 401 before any other extraction or data access.
/// The id is the only owner id handlers ever write or filter by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
}

impl AuthenticatedUser {
    fn from_request_sync(req: &HttpRequest) -> Result<Self, AppError> {
        let codec = req.app_data::<web::Data<TokenCodec>>().ok_or_else(|| {
            AppError::InternalServerError("TokenCodec is not registered as app data".into())
        })?;

        let cookie = req
            .cookie(TOKEN_COOKIE)
            .ok_or_else(|| AppError::Unauthorized("Unauthorized".into()))?;

        let claims = codec.verify(cookie.value())?;
        Ok(AuthenticatedUser {
            id: claims.user_id,
            email: claims.email,
        })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_request_sync(req).map_err(ActixError::from))
    }
}
