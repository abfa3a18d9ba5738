//! In-memory provider that records what would have been sent.

use super::{EmailProvider, SendResult};
use crate::error::{EmailError, EmailResult};
use crate::models::Email;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Captures outgoing mail instead of delivering it.
///
/// Tests hand the provider to the code under test and read the captured
/// list back through [`MockSmtpProvider::sent_emails`].
pub struct MockSmtpProvider {
    sent: Arc<Mutex<Vec<Email>>>,
    failure: Option<String>,
}

impl MockSmtpProvider {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failure: None,
        }
    }

    /// A provider whose sends and health probes all fail with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new()
        }
    }

    /// Everything captured so far, in send order.
    pub async fn sent_emails(&self) -> Vec<Email> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Whether any captured email was addressed to `address`.
    pub async fn was_sent_to(&self, address: &str) -> bool {
        self.sent.lock().await.iter().any(|e| e.to == address)
    }
}

impl Default for MockSmtpProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailProvider for MockSmtpProvider {
    async fn send(&self, email: &Email) -> EmailResult<SendResult> {
        if let Some(message) = &self.failure {
            return Err(EmailError::Provider(message.clone()));
        }

        let mut sent = self.sent.lock().await;
        sent.push(email.clone());

        Ok(SendResult {
            message_id: Some(format!("mock-{}", sent.len())),
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    async fn health_check(&self) -> EmailResult<bool> {
        match &self.failure {
            Some(message) => Err(EmailError::Provider(message.clone())),
            None => Ok(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_to(address: &str) -> Email {
        Email {
            to: address.to_string(),
            subject: "hello".to_string(),
            body: "world".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_captures_sent_emails() {
        let provider = MockSmtpProvider::new();
        let email = email_to("ops@example.com");

        let result = provider.send(&email).await.unwrap();
        assert_eq!(result.message_id, Some("mock-1".to_string()));
        assert_eq!(provider.sent_count().await, 1);
        assert!(provider.was_sent_to("ops@example.com").await);
        assert_eq!(provider.sent_emails().await[0], email);
    }

    #[tokio::test]
    async fn test_failing_mock_returns_provider_error() {
        let provider = MockSmtpProvider::failing("relay down");

        let err = provider
            .send(&email_to("ops@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, EmailError::Provider(ref m) if m == "relay down"));
        assert_eq!(provider.sent_count().await, 0);
        assert!(provider.health_check().await.is_err());
    }
}
