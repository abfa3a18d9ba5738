//! Runtime settings for one worker instance.

use crate::registry::StreamDef;
use uuid::Uuid;

const DEFAULT_BLOCK_MS: u64 = 5000;
const DEFAULT_MAX_RETRIES: u32 = 3;

fn generated_consumer_id() -> String {
    format!("worker-{}", Uuid::new_v4())
}

/// Everything a worker needs to know about its stream and its own behavior.
///
/// Built from a [`StreamDef`] in production code; tests usually start from
/// [`WorkerConfig::new`] and override through the `with_*` methods.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Stream to consume.
    pub stream_name: String,

    /// Consumer group the worker joins.
    pub consumer_group: String,

    /// Name this worker registers within the group. Generated unless set.
    pub consumer_id: String,

    /// Where permanently failed and retry-exhausted jobs go.
    pub dlq_stream: String,

    /// Approximate cap applied when requeueing (XADD MAXLEN ~).
    pub max_length: i64,

    /// Sleep between polls when a non-blocking read comes back empty.
    pub poll_interval_ms: u64,

    /// Entries fetched per read.
    pub batch_size: usize,

    /// BLOCK timeout for reads, or None to poll.
    pub blocking_timeout_ms: Option<u64>,

    /// Idle time after which another consumer's entry may be claimed.
    pub claim_timeout_ms: u64,

    /// Transient failures tolerated before a job is dead lettered.
    pub max_retries: u32,
}

impl WorkerConfig {
    /// Take stream names, sizes, and intervals from a stream definition.
    pub fn from_stream_def<S: StreamDef>() -> Self {
        Self {
            dlq_stream: S::DLQ_STREAM.to_string(),
            max_length: S::MAX_LENGTH,
            poll_interval_ms: S::POLL_INTERVAL_MS,
            batch_size: S::BATCH_SIZE,
            claim_timeout_ms: S::CLAIM_TIMEOUT_MS,
            ..Self::new(S::STREAM_NAME, S::CONSUMER_GROUP)
        }
    }

    /// Start from explicit stream and group names with default tuning.
    pub fn new(stream_name: impl Into<String>, consumer_group: impl Into<String>) -> Self {
        Self {
            stream_name: stream_name.into(),
            consumer_group: consumer_group.into(),
            consumer_id: generated_consumer_id(),
            dlq_stream: String::new(),
            max_length: 100_000,
            poll_interval_ms: 1000,
            batch_size: 10,
            blocking_timeout_ms: Some(DEFAULT_BLOCK_MS),
            claim_timeout_ms: 30_000,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_consumer_id(mut self, id: impl Into<String>) -> Self {
        self.consumer_id = id.into();
        self
    }

    pub fn with_dlq_stream(mut self, stream: impl Into<String>) -> Self {
        self.dlq_stream = stream.into();
        self
    }

    pub fn with_poll_interval_ms(mut self, interval: u64) -> Self {
        self.poll_interval_ms = interval;
        self
    }

    /// Batch size, floored at one entry per read.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// `Some(ms)` to read with BLOCK, `None` to poll.
    pub fn with_blocking(mut self, timeout_ms: Option<u64>) -> Self {
        self.blocking_timeout_ms = timeout_ms;
        self
    }

    pub fn with_claim_timeout_ms(mut self, timeout: u64) -> Self {
        self.claim_timeout_ms = timeout;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn is_blocking(&self) -> bool {
        self.blocking_timeout_ms.is_some()
    }
}
