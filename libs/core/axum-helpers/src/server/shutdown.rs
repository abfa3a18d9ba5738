//! Process signal handling for graceful server exit.

use tokio::signal;
use tracing::info;

#[cfg(unix)]
async fn sigterm() {
    signal::unix::signal(signal::unix::SignalKind::terminate())
        .expect("failed to install SIGTERM handler")
        .recv()
        .await;
}

#[cfg(not(unix))]
async fn sigterm() {
    std::future::pending::<()>().await
}

/// Resolves once the process receives SIGINT (Ctrl+C) or SIGTERM.
///
/// Handed to `with_graceful_shutdown` so in-flight requests drain before the
/// listener closes.
pub async fn shutdown_signal() {
    tokio::select! {
        result = signal::ctrl_c() => {
            result.expect("failed to install Ctrl+C handler");
            info!("Received Ctrl+C, draining connections");
        }
        _ = sigterm() => {
            info!("Received SIGTERM, draining connections");
        }
    }
}
