//! Delivery backends for outgoing mail.
//!
//! `EmailProvider` is the seam the processor sends through. `SmtpProvider`
//! is the real backend; `MockSmtpProvider` records sends for tests.

mod mock;
mod smtp;

pub use mock::MockSmtpProvider;
pub use smtp::{SmtpConfig, SmtpProvider};

use crate::error::EmailResult;
use crate::models::Email;
use async_trait::async_trait;

/// Acknowledgement returned once a backend accepts a message.
#[derive(Debug, Clone)]
pub struct SendResult {
    /// Tracking id assigned by the backend, when it reports one.
    pub message_id: Option<String>,
}

/// A backend able to deliver mail, one message per call.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Deliver a single message, returning once the backend accepts it.
    async fn send(&self, email: &Email) -> EmailResult<SendResult>;

    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Probe whether the backend is reachable.
    async fn health_check(&self) -> EmailResult<bool>;
}
