//! Compile-time stream definitions.
//!
//! A [`StreamDef`] names one stream and its tuning in a single place, so a
//! producer in one binary and a worker in another can never disagree about
//! stream names or the dead letter queue.

/// Naming and tuning for one Redis stream.
///
/// Only the three names are mandatory; the tuning constants have defaults
/// that fit a low-volume stream.
///
/// # Example
///
/// ```rust,ignore
/// use stream_worker::StreamDef;
///
/// pub struct StatusChangedStream;
///
/// impl StreamDef for StatusChangedStream {
///     const STREAM_NAME: &'static str = "tasks:status-changed";
///     const CONSUMER_GROUP: &'static str = "notification_workers";
///     const DLQ_STREAM: &'static str = "tasks:status-changed:dlq";
/// }
/// ```
pub trait StreamDef: Send + Sync {
    /// Redis key of the stream itself.
    const STREAM_NAME: &'static str;

    /// Consumer group workers join.
    const CONSUMER_GROUP: &'static str;

    /// Redis key of the dead letter stream.
    const DLQ_STREAM: &'static str;

    /// Approximate cap enforced at append time (XADD MAXLEN ~).
    const MAX_LENGTH: i64 = 100_000;

    /// Entries a worker reads per batch.
    const BATCH_SIZE: usize = 10;

    /// Sleep between empty reads when not blocking.
    const POLL_INTERVAL_MS: u64 = 1000;

    /// Pending entries idle longer than this may be claimed from a dead
    /// consumer.
    const CLAIM_TIMEOUT_MS: u64 = 30_000;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BareStream;

    impl StreamDef for BareStream {
        const STREAM_NAME: &'static str = "test:jobs";
        const CONSUMER_GROUP: &'static str = "test_workers";
        const DLQ_STREAM: &'static str = "test:dlq";
    }

    #[test]
    fn test_tuning_defaults() {
        assert_eq!(BareStream::MAX_LENGTH, 100_000);
        assert_eq!(BareStream::BATCH_SIZE, 10);
        assert_eq!(BareStream::POLL_INTERVAL_MS, 1000);
        assert_eq!(BareStream::CLAIM_TIMEOUT_MS, 30_000);
    }
}
