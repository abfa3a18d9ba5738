//! Redis support: configuration, connecting with retry, and the
//! readiness probe.

mod config;
mod connector;
mod health;

pub use config::RedisConfig;
pub use connector::{connect, connect_from_config, connect_from_config_with_retry};
pub use health::check_health;

// redis types callers need alongside the connectors
pub use redis::aio::ConnectionManager;
pub use redis::{AsyncCommands, Client, RedisResult};
