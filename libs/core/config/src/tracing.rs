use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install the color-eyre panic and error report hooks.
///
/// Goes first in `main`, before anything can fail, so even config errors
/// render with source locations. Environment sections are suppressed to
/// keep secrets out of crash output. Repeat calls are ignored.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Set up the global tracing subscriber for this process.
///
/// Production gets flattened JSON events without targets, which is what
/// the log pipeline ingests. Development gets the pretty human format.
/// Both attach `tracing_error::ErrorLayer` so eyre reports carry span
/// traces, and both respect `RUST_LOG` when it is set.
///
/// Calling this twice is harmless; the second call leaves the existing
/// subscriber in place. Tests rely on that.
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match environment {
        Environment::Production => EnvFilter::new("error"),
        Environment::Development => EnvFilter::new("trace"),
    });

    let installed = match environment {
        Environment::Production => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init(),
        Environment::Development => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init(),
    };

    if installed.is_ok() {
        info!(env = ?environment, "Tracing subscriber installed");
    } else {
        debug!("Tracing subscriber already present, keeping it");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_does_not_panic() {
        init_tracing(&Environment::Development);
        init_tracing(&Environment::Production);
    }

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing(&Environment::Development);
        init_tracing(&Environment::Development);
    }

    #[test]
    fn test_init_tracing_honors_rust_log() {
        temp_env::with_var("RUST_LOG", Some("warn"), || {
            init_tracing(&Environment::Production);
        });
    }
}
