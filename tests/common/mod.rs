//! Shared setup for the HTTP tests

#![allow(dead_code)]

use std::sync::{Arc, Once};

use tempfile::TempDir;

use linkhub::api::AppState;
use linkhub::api::jwt::JwtService;
use linkhub::config::{DatabaseConfig, RouteConfig, init_config};
use linkhub::rate_limit::{MemoryRateLimiter, RateLimitPolicy};
use linkhub::storage::{AccountStore, NewAccount, SeaOrmStorage};

pub const TEST_SECRET: &str = "linkhub-test-secret-0123456789abcdef";

static INIT: Once = Once::new();

pub fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

pub struct TestEnv {
    pub state: AppState,
    pub storage: Arc<SeaOrmStorage>,
    pub jwt: Arc<JwtService>,
    pub routes: RouteConfig,
    _dir: TempDir,
}

impl TestEnv {
    pub async fn new() -> Self {
        Self::with_policy(RateLimitPolicy::default()).await
    }

    pub async fn with_policy(policy: RateLimitPolicy) -> Self {
        init_test_config();

        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = dir.path().join("api_test.db");
        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

        let storage = Arc::new(
            SeaOrmStorage::new(&db_url, "sqlite", &DatabaseConfig::default())
                .await
                .expect("Failed to create storage"),
        );
        let jwt = Arc::new(JwtService::new(TEST_SECRET, 7));
        let state = AppState::new(
            storage.clone(),
            Arc::new(MemoryRateLimiter::new()),
            policy,
            jwt.clone(),
        );

        Self {
            state,
            storage,
            jwt,
            routes: RouteConfig::default(),
            _dir: dir,
        }
    }

    /// Insert a user + profile directly, skipping password hashing
    pub async fn seed_account(&self, user_id: &str, username: &str) {
        self.storage
            .create_account(NewAccount {
                user_id: user_id.to_string(),
                email: format!("{}@example.com", username),
                password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
                username: username.to_string(),
                display_name: Some(username.to_string()),
            })
            .await
            .expect("Failed to seed account");
    }

    pub fn bearer(&self, user_id: &str) -> (&'static str, String) {
        let token = self
            .jwt
            .generate_session_token(user_id)
            .expect("Failed to sign token");
        ("Authorization", format!("Bearer {}", token))
    }
}

/// Build the full application for `env`
#[macro_export]
macro_rules! test_app {
    ($env:expr) => {{
        let state = $env.state.clone();
        let routes = $env.routes.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(linkhub::api::middleware::CatchPanic)
                .wrap(linkhub::api::middleware::RequestIdMiddleware)
                .configure(move |cfg| state.configure(cfg, &routes)),
        )
        .await
    }};
}
