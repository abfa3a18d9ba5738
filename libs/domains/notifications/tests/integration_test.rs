//! End to end tests for the notification pipeline.
//!
//! Events are published to a real Redis stream and consumed by the generic
//! stream worker running `StatusChangedProcessor` over a capturing provider.

use async_trait::async_trait;
use domain_notifications::{
    Email, EmailError, EmailProvider, EmailResult, MockSmtpProvider, SendResult,
    StatusChangedProcessor, StatusNotifier,
};
use domain_tasks::{StatusChangedEvent, TaskStatus};
use std::sync::Arc;
use std::time::Duration;
use stream_worker::{StreamConsumer, StreamProducer, StreamWorker, WorkerConfig};
use test_utils::TestRedis;
use tokio::sync::watch;
use uuid::Uuid;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_config(stream: &str) -> WorkerConfig {
    WorkerConfig::new(stream, "notification_workers")
        .with_dlq_stream(format!("{stream}:dlq"))
        .with_blocking(None)
        .with_poll_interval_ms(50)
        .with_claim_timeout_ms(500)
}

async fn dlq_length(redis: &TestRedis, stream: &str) -> i64 {
    let mut conn = redis.connection();
    let mut dlq_len: i64 = 0;
    for _ in 0..100 {
        dlq_len = redis::cmd("XLEN")
            .arg(format!("{stream}:dlq"))
            .query_async(&mut conn)
            .await
            .unwrap();
        if dlq_len > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    dlq_len
}

/// Provider that rejects emails for one task and captures the rest.
struct RejectingProvider {
    inner: MockSmtpProvider,
    reject_task: Uuid,
}

#[async_trait]
impl EmailProvider for RejectingProvider {
    async fn send(&self, email: &Email) -> EmailResult<SendResult> {
        if email.subject.contains(&self.reject_task.to_string()) {
            return Err(EmailError::Provider("mailbox unavailable".to_string()));
        }
        self.inner.send(email).await
    }

    fn name(&self) -> &'static str {
        "rejecting"
    }

    async fn health_check(&self) -> EmailResult<bool> {
        self.inner.health_check().await
    }
}

// ============================================================================
// End to End Delivery
// ============================================================================

#[tokio::test]
async fn test_status_change_event_becomes_exactly_one_email() {
    let redis = TestRedis::new().await;
    let stream = "status:delivery";
    let producer = StreamProducer::new(redis.connection(), stream);

    let task_id = Uuid::now_v7();
    producer
        .send(&StatusChangedEvent::new(task_id, TaskStatus::Done))
        .await
        .unwrap();

    let provider = Arc::new(MockSmtpProvider::new());
    let processor = StatusChangedProcessor::with_arc(
        Arc::clone(&provider),
        StatusNotifier::new("ops@example.com"),
    );
    let worker = StreamWorker::new(redis.connection(), processor, test_config(stream));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    for _ in 0..100 {
        if provider.sent_count().await == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap().unwrap();

    let sent = provider.sent_emails().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ops@example.com");
    assert_eq!(sent[0].subject, format!("Task {} status changed", task_id));
    assert_eq!(
        sent[0].body,
        format!("Task with ID {} has new status: DONE", task_id)
    );

    // The handled entry is acknowledged, nothing stays pending
    let consumer = StreamConsumer::new(redis.connection(), test_config(stream));
    let info = consumer.stream_info().await.unwrap();
    assert_eq!(info.pending_count, 0);
}

#[tokio::test]
async fn test_send_failures_reach_the_dead_letter_queue() {
    let redis = TestRedis::new().await;
    let stream = "status:failing";
    let producer = StreamProducer::new(redis.connection(), stream);

    let task_id = Uuid::now_v7();
    producer
        .send(&StatusChangedEvent::new(task_id, TaskStatus::InProgress))
        .await
        .unwrap();

    let provider = Arc::new(MockSmtpProvider::failing("connection refused"));
    let processor = StatusChangedProcessor::with_arc(
        Arc::clone(&provider),
        StatusNotifier::new("ops@example.com"),
    );
    let config = test_config(stream).with_max_retries(1);
    let worker = StreamWorker::new(redis.connection(), processor, config);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    let dlq_len = dlq_length(&redis, stream).await;

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap().unwrap();

    assert_eq!(dlq_len, 1);
    assert_eq!(provider.sent_count().await, 0);

    // The dead letter entry keeps the event and the failure for operators
    let mut conn = redis.connection();
    let entries: Vec<(String, Vec<(String, String)>)> = redis::cmd("XRANGE")
        .arg(format!("{stream}:dlq"))
        .arg("-")
        .arg("+")
        .query_async(&mut conn)
        .await
        .unwrap();

    let fields = &entries[0].1;
    let event_json = fields
        .iter()
        .find(|(k, _)| k == "job")
        .map(|(_, v)| v.clone())
        .expect("dead letter entry should carry the event");
    let event: StatusChangedEvent = serde_json::from_str(&event_json).unwrap();

    assert_eq!(event.task_id, task_id);
    assert!(fields.iter().any(|(k, _)| k == "error"));
}

#[tokio::test]
async fn test_one_failing_event_does_not_block_the_batch() {
    let redis = TestRedis::new().await;
    let stream = "status:partial";
    let producer = StreamProducer::new(redis.connection(), stream);

    let doomed = Uuid::now_v7();
    let healthy_a = Uuid::now_v7();
    let healthy_b = Uuid::now_v7();
    producer
        .send_batch(&[
            StatusChangedEvent::new(healthy_a, TaskStatus::Done),
            StatusChangedEvent::new(doomed, TaskStatus::Done),
            StatusChangedEvent::new(healthy_b, TaskStatus::InProgress),
        ])
        .await
        .unwrap();

    let provider = Arc::new(RejectingProvider {
        inner: MockSmtpProvider::new(),
        reject_task: doomed,
    });
    let processor = StatusChangedProcessor::with_arc(
        Arc::clone(&provider),
        StatusNotifier::new("ops@example.com"),
    );
    let config = test_config(stream).with_max_retries(1);
    let worker = StreamWorker::new(redis.connection(), processor, config);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    let dlq_len = dlq_length(&redis, stream).await;

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap().unwrap();

    // Healthy events were delivered once each, the rejected one dead letters
    assert_eq!(dlq_len, 1);
    let sent = provider.inner.sent_emails().await;
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().any(|e| e.subject.contains(&healthy_a.to_string())));
    assert!(sent.iter().any(|e| e.subject.contains(&healthy_b.to_string())));

    let consumer = StreamConsumer::new(redis.connection(), test_config(stream));
    let info = consumer.stream_info().await.unwrap();
    assert_eq!(info.pending_count, 0);
}
