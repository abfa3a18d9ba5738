//! Status change events for the tasks domain.
//!
//! This module defines the event type and Redis stream configuration used to
//! fan task status changes out to downstream workers.

use crate::models::TaskStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stream_worker::{StreamDef, StreamJob};
use uuid::Uuid;

/// Event emitted when a task moves to a new status.
///
/// This is the job type that flows through the tasks:status-changed stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangedEvent {
    /// Unique event ID.
    pub event_id: Uuid,
    /// The task whose status changed.
    pub task_id: Uuid,
    /// The status the task moved to.
    pub status: TaskStatus,
    /// When the change was recorded.
    pub occurred_at: DateTime<Utc>,
    /// Current retry count.
    #[serde(default)]
    pub retry_count: u32,
}

impl StatusChangedEvent {
    pub fn new(task_id: Uuid, status: TaskStatus) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            task_id,
            status,
            occurred_at: Utc::now(),
            retry_count: 0,
        }
    }
}

impl StreamJob for StatusChangedEvent {
    fn job_id(&self) -> String {
        self.event_id.to_string()
    }

    fn retry_count(&self) -> u32 {
        self.retry_count
    }

    fn with_retry(&self) -> Self {
        Self {
            retry_count: self.retry_count + 1,
            ..self.clone() // Keep same event ID for retries
        }
    }
}

/// Status change stream definition.
///
/// Consumed by the notification worker to send one email per event.
pub struct StatusChangedStream;

impl StreamDef for StatusChangedStream {
    /// Stream name for status change events.
    const STREAM_NAME: &'static str = "tasks:status-changed";

    /// Consumer group for notification workers.
    const CONSUMER_GROUP: &'static str = "notification_workers";

    /// Dead letter queue for undeliverable notifications.
    const DLQ_STREAM: &'static str = "tasks:status-changed:dlq";

    /// Shorter max length (events should be consumed quickly).
    const MAX_LENGTH: i64 = 10_000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_changed_stream_def() {
        assert_eq!(StatusChangedStream::STREAM_NAME, "tasks:status-changed");
        assert_eq!(StatusChangedStream::CONSUMER_GROUP, "notification_workers");
        assert_eq!(StatusChangedStream::DLQ_STREAM, "tasks:status-changed:dlq");
        assert_eq!(StatusChangedStream::MAX_LENGTH, 10_000);
    }

    #[test]
    fn test_event_retry_keeps_identity() {
        let event = StatusChangedEvent::new(Uuid::now_v7(), TaskStatus::Done);

        let retry = event.with_retry();
        assert_eq!(retry.retry_count(), 1);
        assert_eq!(retry.event_id, event.event_id);
        assert_eq!(retry.task_id, event.task_id);
    }

    #[test]
    fn test_event_deserializes_without_retry_count() {
        let event = StatusChangedEvent::new(Uuid::now_v7(), TaskStatus::InProgress);
        let mut value = serde_json::to_value(&event).unwrap();
        value.as_object_mut().unwrap().remove("retry_count");

        let parsed: StatusChangedEvent = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.retry_count, 0);
        assert_eq!(parsed.status, TaskStatus::InProgress);
    }
}
