use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use super::RedisConfig;
use crate::common::RetryConfig;

/// Open a managed Redis connection.
///
/// The returned [`ConnectionManager`] reconnects on its own after a broken
/// connection, so callers clone it freely instead of pooling. A `PING` is
/// issued before returning to catch a wrong URL immediately rather than on
/// first use.
pub async fn connect(url: &str) -> redis::RedisResult<ConnectionManager> {
    info!(%url, "Dialing Redis");

    let manager = ConnectionManager::new(Client::open(url)?).await?;

    let mut probe = manager.clone();
    let _: String = redis::cmd("PING").query_async(&mut probe).await?;

    info!("Redis connection ready");
    Ok(manager)
}

/// Open a managed connection described by `config`.
pub async fn connect_from_config(config: RedisConfig) -> redis::RedisResult<ConnectionManager> {
    connect(&config.url).await
}

/// Open a managed connection, retrying while Redis is unreachable.
///
/// Passing `None` uses the default schedule of [`RetryConfig`]. Services
/// call this at startup so a slow-starting Redis does not take them down.
///
/// # Example
/// ```ignore
/// use core_config::FromEnv;
/// use database::redis::{RedisConfig, connect_from_config_with_retry};
///
/// let redis = connect_from_config_with_retry(RedisConfig::from_env()?, None).await?;
/// ```
pub async fn connect_from_config_with_retry(
    config: RedisConfig,
    retry: Option<RetryConfig>,
) -> redis::RedisResult<ConnectionManager> {
    retry
        .unwrap_or_default()
        .run(|| connect(&config.url))
        .await
}
