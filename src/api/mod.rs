//! HTTP surface: middleware, handlers and the shared application state

pub mod constants;
pub mod jwt;
pub mod middleware;
pub mod services;

use std::sync::Arc;

use actix_web::web;

use crate::config::RouteConfig;
use crate::rate_limit::{RateLimitPolicy, RateLimitStore};
use crate::services::{AuthService, LinkService, ProfileService};
use crate::storage::SeaOrmStorage;

use jwt::JwtService;
use services::AppStartTime;
use services::helpers::{json_config, path_config, payload_config};

/// Everything handlers need, built once and shared by every worker
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<SeaOrmStorage>,
    pub links: web::Data<LinkService>,
    pub profiles: web::Data<ProfileService>,
    pub auth: web::Data<AuthService>,
    pub start_time: web::Data<AppStartTime>,
}

impl AppState {
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        limiter: Arc<dyn RateLimitStore>,
        policy: RateLimitPolicy,
        jwt: Arc<JwtService>,
    ) -> Self {
        let links = LinkService::new(storage.clone(), limiter, policy);
        let profiles = ProfileService::new(storage.clone(), storage.clone(), storage.clone());
        let auth = AuthService::new(storage.clone(), jwt);

        Self {
            storage,
            links: web::Data::new(links),
            profiles: web::Data::new(profiles),
            auth: web::Data::new(auth),
            start_time: web::Data::new(AppStartTime::now()),
        }
    }

    /// Register app data, extractor configs and all routes
    pub fn configure(&self, cfg: &mut web::ServiceConfig, routes: &RouteConfig) {
        cfg.app_data(web::Data::new(self.storage.clone()))
            .app_data(self.links.clone())
            .app_data(self.profiles.clone())
            .app_data(self.auth.clone())
            .app_data(self.start_time.clone())
            .app_data(json_config())
            .app_data(path_config())
            .app_data(payload_config())
            .service(services::health_routes(&routes.health_prefix))
            .service(services::api_routes(&routes.api_prefix));
    }
}
