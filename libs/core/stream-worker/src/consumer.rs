//! Consumer group plumbing for Redis streams.
//!
//! Wraps the XREADGROUP/XACK/XCLAIM command family behind methods the worker
//! loop calls, so the loop itself never touches raw Redis replies.

use crate::config::WorkerConfig;
use crate::error::StreamError;
use crate::event::StreamEvent;
use crate::worker::StreamJob;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisResult};
use tracing::{debug, info, warn};

/// XREADGROUP reply shape: each stream name paired with its entries.
type GroupReply = Vec<(String, Vec<Entry>)>;

/// One stream entry: id plus its field/value pairs.
type Entry = (String, Vec<(String, String)>);

/// XPENDING extended-form row: id, owning consumer, idle ms, delivery count.
type PendingRow = (String, String, i64, i64);

/// Entries returned by a single read call.
///
/// Anything that does not decode into a job lands in `unparseable_ids` so the
/// caller can acknowledge it with the batch instead of letting it wedge the
/// consumer group.
pub struct ReadBatch<J: StreamJob> {
    pub events: Vec<StreamEvent<J>>,
    pub unparseable_ids: Vec<String>,
}

impl<J: StreamJob> ReadBatch<J> {
    fn empty() -> Self {
        Self {
            events: Vec::new(),
            unparseable_ids: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.unparseable_ids.is_empty()
    }

    fn from_reply(reply: GroupReply) -> Self {
        let mut batch = Self::empty();
        for (_stream, entries) in reply {
            for entry in entries {
                batch.absorb(entry);
            }
        }
        batch
    }

    /// Sort one entry into `events` or `unparseable_ids`.
    fn absorb(&mut self, (id, fields): Entry) {
        let Some((_, raw)) = fields.iter().find(|(name, _)| name == "job") else {
            warn!(
                stream_id = %id,
                field_names = ?fields.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>(),
                "Entry carries no job field"
            );
            self.unparseable_ids.push(id);
            return;
        };

        match serde_json::from_str::<J>(raw) {
            Ok(job) => self.events.push(StreamEvent::new(id, job)),
            Err(e) => {
                warn!(
                    stream_id = %id,
                    error = %e,
                    "Job payload does not decode, will acknowledge without processing"
                );
                self.unparseable_ids.push(id);
            }
        }
    }
}

fn is_missing_group(err: &redis::RedisError) -> bool {
    err.to_string().contains("NOGROUP")
}

/// Consumer group client bound to one stream and one consumer name.
pub struct StreamConsumer {
    redis: ConnectionManager,
    config: WorkerConfig,
}

impl StreamConsumer {
    pub fn new(redis: ConnectionManager, config: WorkerConfig) -> Self {
        Self { redis, config }
    }

    /// Create the consumer group, tolerating one that already exists.
    pub async fn init_consumer_group(&self) -> Result<(), StreamError> {
        let mut conn = self.redis.clone();

        let created: RedisResult<()> = redis::cmd("XGROUP")
            .arg("CREATE")
            .arg(&self.config.stream_name)
            .arg(&self.config.consumer_group)
            .arg("0")
            .arg("MKSTREAM")
            .query_async(&mut conn)
            .await;

        match created {
            Ok(()) => info!(
                stream = %self.config.stream_name,
                group = %self.config.consumer_group,
                "Created consumer group"
            ),
            Err(e) if e.to_string().contains("BUSYGROUP") => debug!(
                stream = %self.config.stream_name,
                group = %self.config.consumer_group,
                "Consumer group already exists"
            ),
            Err(e) => return Err(StreamError::Redis(e)),
        }

        Ok(())
    }

    /// Entries delivered to this consumer earlier but never acknowledged.
    pub async fn read_pending<J: StreamJob>(
        &self,
        count: usize,
    ) -> Result<ReadBatch<J>, StreamError> {
        self.read_group("0", count, None).await
    }

    /// Entries nobody in the group has seen yet.
    ///
    /// Waits up to the configured blocking timeout when one is set.
    pub async fn read_new<J: StreamJob>(&self, count: usize) -> Result<ReadBatch<J>, StreamError> {
        self.read_group(">", count, self.config.blocking_timeout_ms)
            .await
    }

    async fn read_group<J: StreamJob>(
        &self,
        cursor: &str,
        count: usize,
        block_ms: Option<u64>,
    ) -> Result<ReadBatch<J>, StreamError> {
        let mut conn = self.redis.clone();

        let mut cmd = redis::cmd("XREADGROUP");
        cmd.arg("GROUP")
            .arg(&self.config.consumer_group)
            .arg(&self.config.consumer_id);
        if let Some(ms) = block_ms {
            cmd.arg("BLOCK").arg(ms);
        }
        cmd.arg("COUNT")
            .arg(count)
            .arg("STREAMS")
            .arg(&self.config.stream_name)
            .arg(cursor);

        // A blocking read that times out answers nil rather than an empty array
        let reply: RedisResult<Option<GroupReply>> = cmd.query_async(&mut conn).await;

        match reply {
            Ok(Some(streams)) => Ok(ReadBatch::from_reply(streams)),
            Ok(None) => Ok(ReadBatch::empty()),
            Err(e) if is_missing_group(&e) => Ok(ReadBatch::empty()),
            Err(e) => Err(StreamError::Redis(e)),
        }
    }

    /// Acknowledge every id in one XACK round trip.
    pub async fn ack_batch(&self, stream_ids: &[String]) -> Result<(), StreamError> {
        if stream_ids.is_empty() {
            return Ok(());
        }

        let mut conn = self.redis.clone();

        let mut cmd = redis::cmd("XACK");
        cmd.arg(&self.config.stream_name)
            .arg(&self.config.consumer_group);
        for id in stream_ids {
            cmd.arg(id);
        }

        let acked: i64 = cmd.query_async(&mut conn).await?;
        debug!(requested = stream_ids.len(), acked, "Acknowledged batch");
        Ok(())
    }

    /// Append the job back onto the stream as a brand new entry.
    pub async fn requeue<J: StreamJob>(&self, job: &J) -> Result<(), StreamError> {
        let payload = serde_json::to_string(job)?;
        let mut conn = self.redis.clone();

        let new_id: String = redis::cmd("XADD")
            .arg(&self.config.stream_name)
            .arg("MAXLEN")
            .arg("~")
            .arg(self.config.max_length)
            .arg("*")
            .arg("job")
            .arg(&payload)
            .query_async(&mut conn)
            .await?;

        debug!(
            job_id = %job.job_id(),
            retry_count = job.retry_count(),
            stream_id = %new_id,
            "Requeued job for another attempt"
        );
        Ok(())
    }

    /// Park the job on the dead letter stream together with the error text.
    pub async fn move_to_dlq<J: StreamJob>(&self, job: &J, error: &str) -> Result<(), StreamError> {
        let payload = serde_json::to_string(job)?;
        let mut conn = self.redis.clone();

        let new_id: String = redis::cmd("XADD")
            .arg(&self.config.dlq_stream)
            .arg("*")
            .arg("job")
            .arg(&payload)
            .arg("error")
            .arg(error)
            .query_async(&mut conn)
            .await?;

        warn!(
            job_id = %job.job_id(),
            dlq_stream = %self.config.dlq_stream,
            stream_id = %new_id,
            "Job moved to dead letter queue"
        );
        Ok(())
    }

    /// Take over entries another consumer left idle past the claim timeout.
    ///
    /// Claimed entries join this consumer's pending list, so the next
    /// `read_pending` call picks them up. Returns how many were claimed.
    pub async fn claim_abandoned(&self, count: usize) -> Result<usize, StreamError> {
        let mut conn = self.redis.clone();

        let rows: RedisResult<Vec<PendingRow>> = redis::cmd("XPENDING")
            .arg(&self.config.stream_name)
            .arg(&self.config.consumer_group)
            .arg("-")
            .arg("+")
            .arg(count)
            .query_async(&mut conn)
            .await;

        let rows = match rows {
            Ok(rows) => rows,
            Err(e) if is_missing_group(&e) => return Ok(0),
            Err(e) => return Err(StreamError::Redis(e)),
        };

        let stale: Vec<&str> = rows
            .iter()
            .filter(|(_, owner, idle_ms, _)| {
                owner != &self.config.consumer_id
                    && *idle_ms > self.config.claim_timeout_ms as i64
            })
            .map(|(id, _, _, _)| id.as_str())
            .collect();

        if stale.is_empty() {
            return Ok(0);
        }

        let mut cmd = redis::cmd("XCLAIM");
        cmd.arg(&self.config.stream_name)
            .arg(&self.config.consumer_group)
            .arg(&self.config.consumer_id)
            .arg(self.config.claim_timeout_ms)
            .arg("JUSTID");
        for id in &stale {
            cmd.arg(id);
        }

        let claimed: Vec<String> = cmd.query_async(&mut conn).await?;
        if !claimed.is_empty() {
            warn!(
                count = claimed.len(),
                "Claimed entries abandoned by other consumers"
            );
        }

        Ok(claimed.len())
    }

    /// Length and group backlog of the configured stream.
    pub async fn stream_info(&self) -> Result<StreamInfo, StreamError> {
        let mut conn = self.redis.clone();

        let length: i64 = conn.xlen(&self.config.stream_name).await?;

        // XPENDING summary form: count, smallest id, greatest id, per-consumer counts
        let summary: RedisResult<(i64, Option<String>, Option<String>, Option<Vec<(String, i64)>>)> =
            redis::cmd("XPENDING")
                .arg(&self.config.stream_name)
                .arg(&self.config.consumer_group)
                .query_async(&mut conn)
                .await;

        Ok(StreamInfo {
            stream_name: self.config.stream_name.clone(),
            length,
            pending_count: summary.map(|(count, ..)| count).unwrap_or(0),
            consumer_group: self.config.consumer_group.clone(),
        })
    }
}

/// Snapshot of a stream's length and unacknowledged backlog.
#[derive(Debug, Clone)]
pub struct StreamInfo {
    pub stream_name: String,
    pub length: i64,
    pub pending_count: i64,
    pub consumer_group: String,
}
