//! Custom extractors for Axum handlers.
//!
//! These standardize request rejection handling: every malformed request
//! becomes a 400 with the shared `ErrorResponse` body instead of axum's
//! plain text defaults.

pub mod uuid_path;
pub mod validated_json;

pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
