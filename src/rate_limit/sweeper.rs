use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::MemoryRateLimiter;

/// 启动过期窗口清理任务
///
/// 任务独立运行，请求处理路径从不等待它。返回的 JoinHandle 在关闭时 abort。
pub fn spawn_sweeper(limiter: Arc<MemoryRateLimiter>, interval: Duration) -> JoinHandle<()> {
    info!(
        "Rate limit sweeper started (interval: {}s)",
        interval.as_secs()
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // 第一次 tick 立即触发，跳过
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let removed = limiter.sweep_expired();
            if removed > 0 {
                debug!(
                    "Rate limit sweeper removed {} expired windows ({} live)",
                    removed,
                    limiter.len()
                );
            }
        }
    })
}
