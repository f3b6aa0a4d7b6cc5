//! 账户认证相关端点

use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use governor::middleware::NoOpMiddleware;
use tracing::{debug, info};

use super::helpers::{CookieBuilder, SuccessBody, error_response, respond};
use super::types::{AuthResponse, LoginBody, RegisterBody};
use crate::api::middleware::AuthenticatedUser;
use crate::config::get_config;
use crate::services::{AuthService, AuthSession};
use crate::utils::ip::resolve_client_ip;

/// 基于 IP 地址的限流 key 提取器
///
/// - 默认使用连接 IP（peer_addr），无法被伪造
/// - 如果连接来自配置的可信代理，则使用 X-Forwarded-For
#[derive(Clone, Copy)]
pub struct LoginKeyExtractor;

impl KeyExtractor for LoginKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        let config = get_config();
        let peer = req.peer_addr().map(|addr| addr.to_string());

        resolve_client_ip(peer.as_deref(), req.headers(), &config.server.trusted_proxies)
            .ok_or_else(|| SimpleKeyExtractionError::new("Unable to extract peer IP"))
    }
}

/// 创建登录/注册限流器
///
/// 配置：每秒补充 1 个令牌，突发最多 5 次请求
/// 超限返回 HTTP 429 Too Many Requests
pub fn login_rate_limiter() -> Governor<LoginKeyExtractor, NoOpMiddleware> {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(5)
        .key_extractor(LoginKeyExtractor)
        .finish()
        .expect("Invalid rate limit config");

    debug!("Login rate limiter created: 1 req/s, burst 5");
    Governor::new(&config)
}

fn session_response(status: StatusCode, session: AuthSession) -> HttpResponse {
    let cookie = CookieBuilder::from_config().build_session_cookie(session.token.clone());
    HttpResponse::build(status).cookie(cookie).json(AuthResponse {
        success: true,
        user: session.user,
        token: session.token,
    })
}

pub async fn register(auth: web::Data<AuthService>, body: web::Json<RegisterBody>) -> HttpResponse {
    match auth.register(body.into_inner().into()).await {
        Ok(session) => session_response(StatusCode::CREATED, session),
        Err(e) => error_response(&e),
    }
}

pub async fn login(auth: web::Data<AuthService>, body: web::Json<LoginBody>) -> HttpResponse {
    match auth.login(body.into_inner().into()).await {
        Ok(session) => session_response(StatusCode::OK, session),
        Err(e) => error_response(&e),
    }
}

/// 会话是无状态 JWT，登出只是让 cookie 过期
pub async fn logout() -> HttpResponse {
    info!("User logged out");
    HttpResponse::Ok()
        .cookie(CookieBuilder::from_config().build_expired_session_cookie())
        .json(SuccessBody::ok())
}

pub async fn me(user: AuthenticatedUser, auth: web::Data<AuthService>) -> HttpResponse {
    respond(StatusCode::OK, auth.current_user(&user.user_id).await)
}
