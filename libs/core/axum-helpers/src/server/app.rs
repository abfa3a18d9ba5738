use axum::{Json, Router, routing::get};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

use super::shutdown::shutdown_signal;
use crate::errors::not_found;

/// Bind the configured address and serve until a shutdown signal arrives.
///
/// In-flight requests drain before this returns. Fails when the address
/// cannot be bound or the server dies mid-flight.
///
/// ```ignore
/// use axum::Router;
/// use axum_helpers::server::create_app;
/// use core_config::server::ServerConfig;
///
/// create_app(Router::new(), &ServerConfig::default()).await?;
/// ```
pub async fn create_app(router: Router, server_config: &ServerConfig) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;

    info!("Server starting on {}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        })?;

    Ok(())
}

/// Wrap domain routes with the cross-cutting HTTP stack.
///
/// The produced router serves the OpenAPI document at
/// `/api-docs/openapi.json`, nests `apis` under `/api`, answers unknown
/// paths with a JSON 404, and layers request tracing plus response
/// compression over everything.
///
/// Health endpoints are deliberately not included here. Apps add them with
/// `health_router()` and their own readiness handler, since readiness needs
/// app-specific probes.
///
/// `apis` is expected to carry its own state; domain routers apply state
/// before handing their routes up.
pub fn create_router<T>(apis: Router) -> Router
where
    T: OpenApi + 'static,
{
    let doc = T::openapi();
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route(
            "/api-docs/openapi.json",
            get(move || async move { Json(doc) }),
        )
        .nest("/api", apis)
        .fallback(not_found)
        .layer(trace)
        .layer(CompressionLayer::new())
}

/// Serve like [`create_app`], then run `cleanup` before returning.
///
/// The cleanup future runs after requests have drained, bounded by
/// `shutdown_timeout`. Connection teardown belongs there:
///
/// ```ignore
/// use std::time::Duration;
/// use axum_helpers::server::create_production_app;
///
/// create_production_app(router, &config, Duration::from_secs(30), async move {
///     db.close().await.ok();
/// })
/// .await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()>,
{
    let served = create_app(router, server_config).await;

    info!("Running cleanup tasks (timeout: {:?})", shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(()) => info!("Cleanup finished"),
        Err(_) => tracing::warn!(
            "Cleanup did not finish within {:?}, exiting anyway",
            shutdown_timeout
        ),
    }

    served
}
