//! HTTP server assembly: router construction, health endpoints, and
//! graceful shutdown.
//!
//! The intended wiring order:
//!
//! ```ignore
//! use axum_helpers::server::{create_app, health_router};
//! use core_config::{app_info, server::ServerConfig};
//!
//! let router = axum_helpers::create_router::<ApiDoc>(api_routes);
//! let app = router.merge(health_router(app_info!()));
//! create_app(app, &ServerConfig::default()).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_app, create_production_app, create_router};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::shutdown_signal;
