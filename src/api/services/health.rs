use actix_web::{HttpResponse, web};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, trace};

use super::types::HealthResponse;
use crate::storage::SeaOrmStorage;

/// 应用启动时间
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub started_at: Instant,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }
}

/// Health Service
///
/// 直接调用 storage，不经过业务服务：探针要求快速响应。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        storage: web::Data<Arc<SeaOrmStorage>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> HttpResponse {
        trace!("Received health check request");
        let uptime_secs = app_start_time.started_at.elapsed().as_secs();

        let database = match tokio::time::timeout(Duration::from_secs(5), storage.count_links()).await
        {
            Ok(Ok(count)) => {
                trace!("Storage health check passed, {} links found", count);
                "ok"
            }
            Ok(Err(e)) => {
                error!("Storage health check failed: {}", e);
                "error"
            }
            Err(_) => {
                error!("Storage health check timeout");
                "timeout"
            }
        };

        if database == "ok" {
            HttpResponse::Ok().json(HealthResponse {
                status: "healthy",
                database,
                uptime_secs,
            })
        } else {
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "unhealthy",
                database,
                uptime_secs,
            })
        }
    }

    /// 存活探针，不访问数据库
    pub async fn liveness_check() -> HttpResponse {
        HttpResponse::NoContent().finish()
    }
}
