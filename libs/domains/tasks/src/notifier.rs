//! Fire-and-forget publication of status change events.
//!
//! The service hands a [`StatusChangedEvent`] to a [`ChangeNotifier`] and
//! moves on. The stream-backed implementation forwards events to a background
//! publisher task that owns the Redis producer, so a broker outage can never
//! roll back or delay a committed write. Each event gets a bounded number of
//! publish attempts; after that it is logged and dropped.

use crate::events::{StatusChangedEvent, StatusChangedStream};
use redis::aio::ConnectionManager;
use std::time::Duration;
use stream_worker::StreamProducer;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

const PUBLISH_ATTEMPTS: u32 = 3;
const PUBLISH_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Sink for status change events.
///
/// Implementations must not block the caller: delivery happens out of band.
#[cfg_attr(test, mockall::automock)]
pub trait ChangeNotifier: Send + Sync {
    /// Record that a task moved to a new status.
    fn notify(&self, event: StatusChangedEvent);
}

/// Notifier that forwards events to the stream publisher task.
pub struct StreamNotifier {
    sender: mpsc::UnboundedSender<StatusChangedEvent>,
}

impl StreamNotifier {
    /// Create the notifier and spawn its publisher task.
    ///
    /// The task runs until every `StreamNotifier` clone is dropped and the
    /// channel drains.
    pub fn start(redis: ConnectionManager) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let producer = StreamProducer::from_stream_def::<StatusChangedStream>(redis);
        let handle = tokio::spawn(publish_events(receiver, producer));

        (Self { sender }, handle)
    }
}

impl ChangeNotifier for StreamNotifier {
    fn notify(&self, event: StatusChangedEvent) {
        // Send only fails when the publisher task is gone, i.e. during shutdown
        if let Err(e) = self.sender.send(event) {
            warn!(
                task_id = %e.0.task_id,
                "Publisher task stopped, dropping status change event"
            );
        }
    }
}

/// Drain the channel, publishing each event with bounded fixed-delay retries.
async fn publish_events(
    mut receiver: mpsc::UnboundedReceiver<StatusChangedEvent>,
    producer: StreamProducer,
) {
    info!(stream = %producer.stream_name(), "Status change publisher started");

    while let Some(event) = receiver.recv().await {
        let mut published = false;

        for attempt in 1..=PUBLISH_ATTEMPTS {
            match producer.send(&event).await {
                Ok(_) => {
                    published = true;
                    break;
                }
                Err(e) => {
                    warn!(
                        task_id = %event.task_id,
                        attempt = attempt,
                        error = %e,
                        "Failed to publish status change event"
                    );
                    if attempt < PUBLISH_ATTEMPTS {
                        tokio::time::sleep(PUBLISH_RETRY_DELAY).await;
                    }
                }
            }
        }

        if !published {
            error!(
                task_id = %event.task_id,
                status = %event.status,
                attempts = PUBLISH_ATTEMPTS,
                "Publish retries exhausted, dropping status change event"
            );
        }
    }

    info!("Status change publisher stopped");
}
