//! API 路由配置

use actix_web::web;

use super::auth::{login, login_rate_limiter, logout, me, register};
use super::health::HealthService;
use super::links::{
    create_link, delete_link, list_links, reorder_links, toggle_link, track_click, update_link,
};
use super::profile::{
    create_social_link, delete_social_link, get_profile, list_social_links, public_page,
    update_profile,
};
use crate::api::middleware::UserAuth;

/// 链接路由 `/links`
///
/// `/track` 是公开的，其余都需要登录；固定路径必须在 `/{id}` 之前注册。
pub fn links_routes() -> actix_web::Scope {
    web::scope("/links")
        .route("/track", web::post().to(track_click))
        .route("", web::get().to(list_links).wrap(UserAuth))
        .route("", web::post().to(create_link).wrap(UserAuth))
        .route("/reorder", web::put().to(reorder_links).wrap(UserAuth))
        .route("/{id}/toggle", web::post().to(toggle_link).wrap(UserAuth))
        .route("/{id}", web::patch().to(update_link).wrap(UserAuth))
        .route("/{id}", web::delete().to(delete_link).wrap(UserAuth))
}

/// 认证路由 `/auth`，注册和登录带按 IP 的限流
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/auth")
        .route(
            "/register",
            web::post().to(register).wrap(login_rate_limiter()),
        )
        .route("/login", web::post().to(login).wrap(login_rate_limiter()))
        .route("/logout", web::post().to(logout))
        .route("/me", web::get().to(me).wrap(UserAuth))
}

/// 个人资料路由 `/profile`，全部需要登录
pub fn profile_routes() -> actix_web::Scope {
    web::scope("/profile")
        .route("", web::get().to(get_profile).wrap(UserAuth))
        .route("", web::patch().to(update_profile).wrap(UserAuth))
}

/// 社交链接路由 `/social-links`，全部需要登录
pub fn social_links_routes() -> actix_web::Scope {
    web::scope("/social-links")
        .route("", web::get().to(list_social_links).wrap(UserAuth))
        .route("", web::post().to(create_social_link).wrap(UserAuth))
        .route("/{id}", web::delete().to(delete_social_link).wrap(UserAuth))
}

pub fn api_routes(api_prefix: &str) -> actix_web::Scope {
    web::scope(api_prefix)
        .service(links_routes())
        .service(auth_routes())
        .service(profile_routes())
        .service(social_links_routes())
        .route("/public/{username}", web::get().to(public_page))
}

pub fn health_routes(health_prefix: &str) -> actix_web::Scope {
    web::scope(health_prefix)
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
