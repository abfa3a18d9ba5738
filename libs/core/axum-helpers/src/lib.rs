//! Building blocks for the workspace's Axum services.
//!
//! Three concerns live here:
//!
//! - [`server`]: router assembly, the health endpoints, graceful shutdown
//! - [`errors`]: the JSON error body every handler speaks
//! - [`extractors`]: request extractors that reject with those error bodies
//!
//! A service nests its domain routers, wraps them with [`server::create_router`]
//! to pick up the `/api` prefix and OpenAPI document, merges the health
//! endpoints, and hands the result to [`server::create_app`]:
//!
//! ```ignore
//! use axum_helpers::{create_app, create_router, health_router};
//! use core_config::{app_info, server::ServerConfig};
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! # async fn serve() -> Result<(), Box<dyn std::error::Error>> {
//! let api = axum::Router::new();
//! let app = create_router::<ApiDoc>(api).merge(health_router(app_info!()));
//! create_app(app, &ServerConfig::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod extractors;
pub mod server;

pub use errors::{AppError, ErrorResponse, not_found};

pub use extractors::{UuidPath, ValidatedJson};

pub use server::{
    HealthCheckFuture, HealthResponse, create_app, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};
