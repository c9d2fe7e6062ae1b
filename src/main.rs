//! Calc Cache - arithmetic served through a TTL result cache
//!
//! Binary entry point: wires configuration, logging, the cache backend and
//! the HTTP server together.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use calc_cache::api::{create_router, serve_with_grace, SHUTDOWN_GRACE};
use calc_cache::{AppState, Backend, CacheBackend, Config};

/// Main entry point for the calculation cache server.
///
/// # Startup Sequence
/// 1. Load configuration from environment variables
/// 2. Initialize tracing subscriber for logging
/// 3. Create the cache backend (memory, or Redis when `REDIS_URL` is set)
/// 4. Optionally flush the cache
/// 5. Create Axum router with all endpoints
/// 6. Serve HTTP until SIGINT/SIGTERM, drain for up to 10s, then close the backend
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // Defaults to "info" level ("debug" with DEBUG set), RUST_LOG overrides
    let default_filter = if config.debug {
        "calc_cache=debug,tower_http=debug"
    } else {
        "calc_cache=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Calc Cache server");
    info!(
        "Configuration loaded: ttl={}s, sweep_interval={}s, port={}, redis={}, flush_on_boot={}",
        config.cache_ttl,
        config.sweep_interval,
        config.server_port,
        config.redis_url.is_some(),
        config.flush_on_boot
    );

    let backend = Backend::from_config(&config)
        .await
        .context("Failed to initialize cache backend")?;
    info!("Cache backend initialized: {}", backend.kind());

    let cache: Arc<dyn CacheBackend> = Arc::new(backend);

    if config.flush_on_boot {
        cache.flush().await;
        info!("Cache flushed on boot");
    }

    let app = create_router(AppState::new(cache.clone()));

    let addr = SocketAddr::new(config.bind_ip, config.server_port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    let served = serve_with_grace(listener, app, shutdown_signal(), SHUTDOWN_GRACE).await;

    cache.close().await;
    info!("Cache backend closed");

    served.context("HTTP server error")?;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
