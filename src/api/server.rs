//! HTTP Server Lifecycle
//!
//! Serves a router until a shutdown signal arrives, then drains in-flight
//! requests for at most a bounded grace period.

use std::future::{Future, IntoFuture};
use std::io;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Time granted to in-flight requests once shutdown starts.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Serves `app` on `listener` until `signal` resolves.
///
/// After the signal, open connections get `grace` to finish. Connections
/// still busy past that point are dropped and the call returns `Ok`.
pub async fn serve_with_grace<S>(
    listener: TcpListener,
    app: Router,
    signal: S,
    grace: Duration,
) -> io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let draining = CancellationToken::new();

    let trigger = draining.clone();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            trigger.cancel();
        })
        .into_future();

    tokio::select! {
        result = server => result,
        _ = drain_deadline(draining, grace) => {
            warn!("In-flight requests still running after {:?}, forcing shutdown", grace);
            Ok(())
        }
    }
}

async fn drain_deadline(draining: CancellationToken, grace: Duration) {
    draining.cancelled().await;
    tokio::time::sleep(grace).await;
}
