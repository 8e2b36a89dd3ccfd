use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpResponse,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::cookie::{removal_cookie, TOKEN_COOKIE};
use crate::auth::guard::{decide, Decision, RouteClass, TokenState};
use crate::auth::token::TokenCodec;

/// Runs the session guard in front of every request.
///
/// Protected pages without a valid session are redirected to `/login`, and the
/// login/register pages redirect to `/dashboard` when a valid session exists.
/// Stale cookies are cleared. Other paths (the JSON API included) pass through;
/// API handlers resolve the caller themselves through `AuthenticatedUser`.
pub struct SessionGuard {
    codec: Rc<TokenCodec>,
}

impl SessionGuard {
    pub fn new(codec: TokenCodec) -> Self {
        Self {
            codec: Rc::new(codec),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = SessionGuardService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGuardService {
            service,
            codec: Rc::clone(&self.codec),
        }))
    }
}

pub struct SessionGuardService<S> {
    service: S,
    codec: Rc<TokenCodec>,
}

impl<S> SessionGuardService<S> {
    fn token_state(&self, req: &ServiceRequest) -> TokenState {
        match req.cookie(TOKEN_COOKIE) {
            None => TokenState::Absent,
            Some(cookie) => match self.codec.verify(cookie.value()) {
                Ok(_) => TokenState::Valid,
                Err(_) => TokenState::Invalid,
            },
        }
    }
}

impl<S, B> Service<ServiceRequest> for SessionGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let route = RouteClass::of(req.path());
        if route == RouteClass::Public {
            let fut = self.service.call(req);
            return Box::pin(async move { Ok(fut.await?.map_into_left_body()) });
        }

        let token = self.token_state(&req);
        match decide(route, token) {
            Decision::Allow => {
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Decision::AllowAndClearCookie => {
                log::debug!("clearing stale session cookie on {}", req.path());
                let fut = self.service.call(req);
                Box::pin(async move {
                    let mut res = fut.await?;
                    res.response_mut().add_cookie(&removal_cookie())?;
                    Ok(res.map_into_left_body())
                })
            }
            Decision::Redirect {
                location,
                clear_cookie,
            } => {
                log::debug!("session guard redirecting {} to {}", req.path(), location);
                let mut response = HttpResponse::Found();
                response.insert_header((header::LOCATION, location));
                if clear_cookie {
                    response.cookie(removal_cookie());
                }
                let res = req.into_response(response.finish()).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}
