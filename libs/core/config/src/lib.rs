//! Environment-driven configuration shared by every binary in the
//! workspace, plus tracing and panic handler setup.

pub mod app;
pub mod server;
pub mod tracing;

pub use app::AppInfo;

use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("required environment variable '{0}' is not set")]
    MissingEnvVar(String),

    #[error("environment variable '{key}' did not parse: {details}")]
    ParseError { key: String, details: String },
}

/// Deployment flavor, decided once at startup from `APP_ENV`.
///
/// Anything other than `production` (case-insensitive) counts as
/// development, so a typo can never accidentally switch a deployment
/// into the quieter production logging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        match env::var("APP_ENV") {
            Ok(v) if v.eq_ignore_ascii_case("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Implemented by every config struct that knows how to assemble itself
/// from environment variables.
pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

/// Read `key`, substituting `default` when it is unset.
pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read `key`, failing loudly when it is unset.
pub fn env_required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_app_env_is_development() {
        temp_env::with_var_unset("APP_ENV", || {
            let env = Environment::from_env();
            assert!(env.is_development());
            assert!(!env.is_production());
        });
    }

    #[test]
    fn test_production_spellings() {
        for spelling in ["production", "PRODUCTION", "Production"] {
            temp_env::with_var("APP_ENV", Some(spelling), || {
                assert_eq!(Environment::from_env(), Environment::Production);
            });
        }
    }

    #[test]
    fn test_unrecognized_app_env_is_development() {
        temp_env::with_var("APP_ENV", Some("staging"), || {
            assert_eq!(Environment::from_env(), Environment::Development);
        });
    }

    #[test]
    fn test_env_or_default_prefers_the_variable() {
        temp_env::with_var("SOME_KNOB", Some("tuned"), || {
            assert_eq!(env_or_default("SOME_KNOB", "fallback"), "tuned");
        });

        temp_env::with_var_unset("SOME_KNOB", || {
            assert_eq!(env_or_default("SOME_KNOB", "fallback"), "fallback");
        });
    }

    #[test]
    fn test_env_required_reports_the_key() {
        temp_env::with_var("MUST_EXIST", Some("present"), || {
            assert_eq!(env_required("MUST_EXIST").unwrap(), "present");
        });

        temp_env::with_var_unset("MUST_EXIST", || {
            let err = env_required("MUST_EXIST").unwrap_err();
            assert!(err.to_string().contains("MUST_EXIST"));
            assert!(err.to_string().contains("not set"));
        });
    }
}
