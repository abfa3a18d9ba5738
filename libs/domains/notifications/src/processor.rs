//! Stream processor that turns status change events into emails.

use crate::error::EmailError;
use crate::mailer::StatusNotifier;
use crate::providers::EmailProvider;
use async_trait::async_trait;
use domain_tasks::StatusChangedEvent;
use std::sync::Arc;
use stream_worker::{StreamError, StreamProcessor};
use tracing::info;

/// Sends one email per status change event.
///
/// Each event is handled synchronously: the send must complete before the
/// event counts as processed and becomes eligible for acknowledgement.
pub struct StatusChangedProcessor<P: EmailProvider> {
    provider: Arc<P>,
    mailer: StatusNotifier,
}

impl<P: EmailProvider + 'static> StatusChangedProcessor<P> {
    /// Create a new processor.
    pub fn new(provider: P, mailer: StatusNotifier) -> Self {
        Self {
            provider: Arc::new(provider),
            mailer,
        }
    }

    /// Create a processor sharing an existing provider.
    pub fn with_arc(provider: Arc<P>, mailer: StatusNotifier) -> Self {
        Self { provider, mailer }
    }
}

#[async_trait]
impl<P: EmailProvider + 'static> StreamProcessor<StatusChangedEvent> for StatusChangedProcessor<P> {
    async fn process(&self, event: &StatusChangedEvent) -> Result<(), StreamError> {
        info!(
            event_id = %event.event_id,
            task_id = %event.task_id,
            status = %event.status,
            retry_count = %event.retry_count,
            "Processing status change event"
        );

        let email = self.mailer.status_changed(event);
        let result = self.provider.send(&email).await?;

        info!(
            event_id = %event.event_id,
            task_id = %event.task_id,
            provider = self.provider.name(),
            message_id = ?result.message_id,
            "Status change notification sent"
        );

        Ok(())
    }

    fn name(&self) -> &'static str {
        "StatusChangedProcessor"
    }

    async fn health_check(&self) -> Result<bool, StreamError> {
        Ok(self.provider.health_check().await?)
    }
}

/// Provider failures are transient: the worker requeues the event and moves
/// it to the dead letter queue once retries run out.
impl From<EmailError> for StreamError {
    fn from(e: EmailError) -> Self {
        StreamError::transient(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockSmtpProvider;
    use domain_tasks::TaskStatus;
    use stream_worker::ErrorCategory;
    use uuid::Uuid;

    fn test_processor(provider: MockSmtpProvider) -> (StatusChangedProcessor<MockSmtpProvider>, Arc<MockSmtpProvider>) {
        let provider = Arc::new(provider);
        let processor =
            StatusChangedProcessor::with_arc(Arc::clone(&provider), StatusNotifier::new("ops@example.com"));
        (processor, provider)
    }

    #[tokio::test]
    async fn test_process_sends_one_email() {
        let (processor, provider) = test_processor(MockSmtpProvider::new());
        let event = StatusChangedEvent::new(Uuid::now_v7(), TaskStatus::Done);

        processor.process(&event).await.unwrap();

        assert_eq!(provider.sent_count().await, 1);
        assert!(provider.was_sent_to("ops@example.com").await);
        let sent = provider.sent_emails().await;
        assert!(sent[0].subject.contains(&event.task_id.to_string()));
    }

    #[tokio::test]
    async fn test_send_failure_is_transient() {
        let (processor, provider) = test_processor(MockSmtpProvider::failing("relay down"));
        let event = StatusChangedEvent::new(Uuid::now_v7(), TaskStatus::InProgress);

        let err = processor.process(&event).await.unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Transient);
        assert_eq!(provider.sent_count().await, 0);
    }

    #[tokio::test]
    async fn test_health_check_reflects_provider() {
        let (healthy, _) = test_processor(MockSmtpProvider::new());
        assert!(healthy.health_check().await.unwrap());

        let (unhealthy, _) = test_processor(MockSmtpProvider::failing("relay down"));
        assert!(unhealthy.health_check().await.is_err());
    }
}
