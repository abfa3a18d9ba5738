//! Connectors for the two stores this workspace talks to.
//!
//! PostgreSQL holds the task records, Redis carries the status change
//! stream. Both sides share the same shape: a config struct loadable from
//! the environment, a connect function with startup retry, and a health
//! check for readiness probes.
//!
//! # Features
//!
//! - `postgres` (default): SeaORM pool plus migration runner
//! - `redis` (default): managed connection for streams
//! - `config`: `FromEnv` impls for the config structs
//! - `all`: everything above
//!
//! # Example
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{self, PostgresConfig};
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "taskboard_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "redis")]
pub mod redis;

pub use common::{DatabaseError, DatabaseResult};
