//! Error types for email notifications.

use thiserror::Error;

/// Result type for email operations.
pub type EmailResult<T> = Result<T, EmailError>;

/// Errors that can occur while building or sending an email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// The backend failed: transport setup, relay rejection, timeouts.
    #[error("email backend: {0}")]
    Provider(String),

    /// An address did not parse as a mailbox.
    #[error("bad email address: {0}")]
    InvalidAddress(String),
}
