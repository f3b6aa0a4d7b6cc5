//! Server mode
//!
//! Builds the shared state, starts the HTTP server and waits for either the
//! server to exit or a shutdown signal.

use actix_web::{App, HttpServer, middleware::DefaultHeaders};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::middleware::{CatchPanic, RequestIdMiddleware};
use crate::config::get_config;
use crate::runtime::lifetime::{shutdown, startup};

pub async fn run_server() -> Result<()> {
    let startup::StartupContext {
        state,
        storage,
        background_tasks,
    } = startup::prepare_server_startup()
        .await
        .context("Server startup failed")?;

    let config = get_config();
    let routes = config.routes.clone();
    let cpu_count = config.server.cpu_count.clamp(1, 32);

    if config.server.trusted_proxies.is_empty() {
        info!("No trusted proxies configured, X-Forwarded-For is ignored");
    } else {
        warn!(
            "Trusting X-Forwarded-For from proxies: {:?}",
            config.server.trusted_proxies
        );
    }

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(CatchPanic)
            .wrap(RequestIdMiddleware) // 为每个请求生成 request_id
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .configure(|cfg| state.configure(cfg, &routes))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count)
    .disable_signals()
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    warn!("Starting server at http://{}", bind_address);
    let handle = server.handle();

    tokio::select! {
        res = server => {
            res.context("HTTP server error")?;
        }
        _ = shutdown::wait_for_signal() => {
            handle.stop(true).await;
            info!("HTTP server stopped");
        }
    }

    shutdown::perform_shutdown(storage, background_tasks).await;
    warn!("Graceful shutdown: all tasks completed");
    Ok(())
}
