//! Task API server.
//!
//! Wires configuration, PostgreSQL, Redis, the tasks domain, and the HTTP
//! stack together, then serves until a shutdown signal arrives.

use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_tasks::{PgTaskRepository, StreamNotifier, TaskService};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod config;
mod openapi;
mod ready;

use config::Config;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Error report hooks go in before anything can fail
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let (db, redis) = tokio::try_join!(
        async {
            database::postgres::connect_from_config_with_retry(config.database.clone(), None)
                .await
                .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))
        },
        async {
            database::redis::connect_from_config_with_retry(config.redis.clone(), None)
                .await
                .map_err(|e| eyre::eyre!("Redis connection failed: {}", e))
        }
    )?;

    database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
        .await
        .map_err(|e| eyre::eyre!("Database migrations failed: {}", e))?;

    // Repository for persistence, notifier for status change events
    let repository = PgTaskRepository::new(db.clone());
    let (notifier, _publisher) = StreamNotifier::start(redis.clone());
    let service = TaskService::new(repository, Arc::new(notifier));

    let api_routes = axum::Router::new().nest("/tasks", domain_tasks::handlers::router(service));
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes);

    // /health reports name and version, /ready probes both stores
    let app = router
        .merge(health_router(config.app))
        .merge(ready::ready_router(db.clone(), redis.clone()));

    info!("Starting taskboard API");

    create_production_app(app, &config.server, SHUTDOWN_GRACE, async move {
        info!("Shutting down: closing database connections");
        tokio::join!(
            async {
                if let Err(e) = db.close().await {
                    tracing::error!("Error closing PostgreSQL: {}", e);
                }
            },
            async {
                // ConnectionManager shuts down when its last clone drops
                drop(redis);
            }
        );
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Taskboard API shutdown complete");
    Ok(())
}
