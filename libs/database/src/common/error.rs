use thiserror::Error;

/// Errors surfaced by the connectors and health checks in this crate.
///
/// Wraps the backend-specific error types so callers that talk to both
/// stores can handle failures through a single enum.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[cfg(feature = "postgres")]
    #[error("postgres: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    #[cfg(feature = "redis")]
    #[error("redis: {0}")]
    Redis(#[from] redis::RedisError),

    /// The store answered, but not with what a healthy instance returns.
    #[error("health probe failed: {0}")]
    HealthCheckFailed(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
