//! Background worker that turns task status change events into emails.
//!
//! Joins the `notification_workers` consumer group on the status change
//! stream, sends one email per event through SMTP, and acknowledges each
//! batch only after every event in it has been handled. Events whose email
//! keeps failing end up on the dead letter stream. A small HTTP server
//! exposes `/health` for liveness probes.

use axum_helpers::server::{create_app, health_router};
use core_config::{Environment, FromEnv, app_info, server::ServerConfig};
use database::redis::{RedisConfig, connect_from_config_with_retry};
use domain_notifications::{SmtpProvider, StatusChangedProcessor, StatusNotifier};
use domain_tasks::{StatusChangedEvent, StatusChangedStream};
use eyre::{Result, WrapErr};
use stream_worker::{StreamProcessor, StreamWorker, WorkerConfig};
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Port for the liveness endpoint.
///
/// `NOTIFY_WORKER_HEALTH_PORT` wins over `HEALTH_PORT`; 8082 otherwise.
fn health_port() -> u16 {
    ["NOTIFY_WORKER_HEALTH_PORT", "HEALTH_PORT"]
        .iter()
        .find_map(|key| std::env::var(key).ok())
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(8082)
}

/// Bring the worker up and run it until a shutdown signal arrives.
///
/// Fails when the Redis configuration is missing, the connection cannot be
/// established, or the SMTP transport cannot be built. An unreachable relay
/// is deliberately not fatal; unsent events simply stay on the stream.
pub async fn run() -> Result<()> {
    let environment = Environment::from_env();
    core_config::tracing::init_tracing(&environment);

    let app_info = app_info!();
    info!(
        name = %app_info.name,
        version = %app_info.version,
        env = ?environment,
        "Notify worker starting"
    );

    let redis_config = RedisConfig::from_env().wrap_err("Redis configuration is incomplete")?;
    let redis = connect_from_config_with_retry(redis_config, None)
        .await
        .wrap_err("Redis is unreachable")?;

    // SMTP transport plus the fixed status change template
    let provider = SmtpProvider::from_env().wrap_err("Failed to initialize SMTP transport")?;
    let processor = StatusChangedProcessor::new(provider, StatusNotifier::from_env());

    match processor.health_check().await {
        Ok(true) => info!("SMTP relay reachable"),
        _ => warn!("SMTP relay not reachable yet, sends will be retried"),
    }

    // Short BLOCK keeps delivery instant without delaying shutdown
    let config = WorkerConfig::from_stream_def::<StatusChangedStream>().with_blocking(Some(1000));
    info!(
        stream = %config.stream_name,
        consumer_group = %config.consumer_group,
        consumer_id = %config.consumer_id,
        dlq_stream = %config.dlq_stream,
        batch_size = config.batch_size,
        max_retries = config.max_retries,
        "Consumer settings resolved"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_requested().await;
        let _ = shutdown_tx.send(true);
    });

    let port = health_port();
    tokio::spawn(async move {
        let server = ServerConfig::new("0.0.0.0".to_string(), port);
        if let Err(e) = create_app(health_router(app_info), &server).await {
            error!(error = %e, "Health server failed");
        }
    });

    info!("Consuming status change events");
    let worker = StreamWorker::<StatusChangedEvent, _>::new(redis, processor, config);
    worker
        .run(shutdown_rx)
        .await
        .wrap_err("Stream worker exited with an error")?;

    info!("Notify worker stopped");
    Ok(())
}

/// Resolves when SIGINT or SIGTERM arrives.
async fn shutdown_requested() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Ctrl+C handler could not be installed");
    };

    #[cfg(unix)]
    let sigterm = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler could not be installed")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl+C received, stopping"),
        _ = sigterm => info!("SIGTERM received, stopping"),
    }
}
