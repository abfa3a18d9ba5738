//! Readiness probe for the API binary.
//!
//! `/health` only proves the process is up. This route answers 503 until
//! both PostgreSQL and Redis respond, which is what deploy tooling should
//! gate traffic on.

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use database::postgres::DatabaseConnection;
use database::redis::ConnectionManager;

#[derive(Clone)]
pub struct ReadyState {
    db: DatabaseConnection,
    redis: ConnectionManager,
}

/// Probe both stores and fold the results into one readiness reply.
async fn ready_handler(State(state): State<ReadyState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
        (
            "database",
            Box::pin(async {
                database::postgres::check_health(&state.db)
                    .await
                    .map_err(|e| e.to_string())
            }),
        ),
        (
            "redis",
            Box::pin(async {
                let mut redis = state.redis.clone();
                database::redis::check_health(&mut redis)
                    .await
                    .map_err(|e| e.to_string())
            }),
        ),
    ];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}

/// Router exposing `/ready`, carrying its own state so it merges cleanly
/// into the stateless application router.
pub fn ready_router(db: DatabaseConnection, redis: ConnectionManager) -> Router {
    Router::new()
        .route("/ready", get(ready_handler))
        .with_state(ReadyState { db, redis })
}
