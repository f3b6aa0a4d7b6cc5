use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::api::AppState;
use crate::api::jwt::{JwtService, generate_secret};
use crate::config::{get_config, update_config};
use crate::rate_limit::{MemoryRateLimiter, RateLimitPolicy, RateLimitStore, spawn_sweeper};
use crate::services::LinkService;
use crate::storage::{SeaOrmStorage, StorageFactory};

/// 启动阶段产出的所有共享状态与后台任务
pub struct StartupContext {
    pub state: AppState,
    pub storage: Arc<SeaOrmStorage>,
    pub background_tasks: Vec<JoinHandle<()>>,
}

/// 准备服务器启动的上下文
///
/// 包括 JWT 密钥、存储、限流器和后台清理任务
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    ensure_jwt_secret();
    let config = get_config();

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let sweep_interval = Duration::from_secs(config.rate_limit.sweep_interval_secs.max(1));

    let limiter = Arc::new(MemoryRateLimiter::new());
    let sweeper = spawn_sweeper(limiter.clone(), sweep_interval);
    info!("Rate limiter backend: {}", limiter.name());

    let policy = RateLimitPolicy::from_config(&config.rate_limit);
    let jwt = Arc::new(JwtService::from_config(&config.auth));

    let state = AppState::new(storage.clone(), limiter, policy, jwt);
    let lock_pruner = spawn_lock_pruner(state.links.clone().into_inner(), sweep_interval);

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        state,
        storage,
        background_tasks: vec![sweeper, lock_pruner],
    })
}

/// 未配置 JWT 密钥时生成一个随机密钥写回全局配置
fn ensure_jwt_secret() {
    if !get_config().auth.jwt_secret.is_empty() {
        return;
    }

    warn!(
        "auth.jwt_secret is not set, generated a random secret. \
         Sessions will not survive a restart."
    );
    let secret = generate_secret(48);
    update_config(|cfg| cfg.auth.jwt_secret = secret);
}

/// 定期清理空闲的 owner 锁，防止锁表随用户数增长
fn spawn_lock_pruner(links: Arc<LinkService>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let removed = links.prune_locks();
            if removed > 0 {
                debug!("Pruned {} idle owner locks", removed);
            }
        }
    })
}
