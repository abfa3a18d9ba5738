#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv};

/// Where to find Redis.
///
/// Redis needs no pool tuning here because the connection manager
/// multiplexes a single connection, so the URL is the whole story.
#[derive(Clone, Debug)]
pub struct RedisConfig {
    pub url: String,
}

impl RedisConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self::new("redis://127.0.0.1:6379")
    }
}

/// Reads `REDIS_URL`, accepting `REDIS_HOST` as a legacy spelling.
#[cfg(feature = "config")]
impl FromEnv for RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        std::env::var("REDIS_URL")
            .or_else(|_| std::env::var("REDIS_HOST"))
            .map(Self::new)
            .map_err(|_| ConfigError::MissingEnvVar("REDIS_URL or REDIS_HOST".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stores_url() {
        let config = RedisConfig::new("redis://cache.internal:6379");
        assert_eq!(config.url, "redis://cache.internal:6379");
    }

    #[test]
    fn test_default_points_at_localhost() {
        assert_eq!(RedisConfig::default().url, "redis://127.0.0.1:6379");
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_redis_url_wins_over_redis_host() {
        temp_env::with_vars(
            [
                ("REDIS_URL", Some("redis://primary:6379")),
                ("REDIS_HOST", Some("redis://ignored:6379")),
            ],
            || {
                let config = RedisConfig::from_env().unwrap();
                assert_eq!(config.url, "redis://primary:6379");
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_redis_host_is_accepted_alone() {
        temp_env::with_vars(
            [
                ("REDIS_URL", None::<&str>),
                ("REDIS_HOST", Some("redis://legacy:6379")),
            ],
            || {
                let config = RedisConfig::from_env().unwrap();
                assert_eq!(config.url, "redis://legacy:6379");
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_both_missing_is_an_error() {
        temp_env::with_vars([("REDIS_URL", None::<&str>), ("REDIS_HOST", None)], || {
            let err = RedisConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("REDIS_URL"));
        });
    }
}
