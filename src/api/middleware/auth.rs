use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, trace};

use crate::api::constants;
use crate::api::services::helpers::error_response;
use crate::errors::LinkhubError;
use crate::services::AuthService;

/// 认证方式标记
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMethod {
    Bearer,
    Cookie,
}

/// The caller resolved from a valid session token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub method: AuthMethod,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or_else(|| LinkhubError::unauthorized("Unauthorized").into()),
        )
    }
}

/// User session middleware
///
/// Accepts `Authorization: Bearer <jwt>` first, then the session cookie.
#[derive(Clone, Default)]
pub struct UserAuth;

impl<S, B> Transform<S, ServiceRequest> for UserAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = UserAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(UserAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct UserAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S> UserAuthMiddleware<S> {
    /// 从 Authorization header 提取 Bearer token
    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn extract_cookie_token(req: &ServiceRequest) -> Option<String> {
        req.cookie(constants::SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .filter(|s| !s.is_empty())
    }

    fn authenticate(req: &ServiceRequest) -> Option<AuthenticatedUser> {
        let auth = req.app_data::<web::Data<AuthService>>()?;

        let candidates = [
            (Self::extract_bearer_token(req), AuthMethod::Bearer),
            (Self::extract_cookie_token(req), AuthMethod::Cookie),
        ];

        for (token, method) in candidates {
            let Some(token) = token else { continue };
            match auth.jwt().validate_session_token(&token) {
                Ok(claims) => {
                    trace!("Authenticated {} via {:?}", claims.sub, method);
                    return Some(AuthenticatedUser {
                        user_id: claims.sub,
                        method,
                    });
                }
                Err(e) => debug!("{:?} token rejected: {}", method, e),
            }
        }
        None
    }
}

impl<S, B> Service<ServiceRequest> for UserAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            match Self::authenticate(&req) {
                Some(user) => {
                    req.extensions_mut().insert(user);
                    let response = srv.call(req).await?.map_into_left_body();
                    Ok(response)
                }
                None => {
                    let response = error_response(&LinkhubError::unauthorized("Unauthorized"));
                    Ok(req.into_response(response.map_into_right_body()))
                }
            }
        })
    }
}
