//! Appending jobs to a stream.

use crate::error::StreamError;
use crate::registry::StreamDef;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use serde::Serialize;
use tracing::debug;

/// Serializes jobs and appends them to one stream.
///
/// Publishing services hold one of these per stream. Clones share the
/// underlying managed connection, so handing a clone to a background task
/// costs nothing.
///
/// Every append trims the stream to roughly `max_length` entries
/// (`MAXLEN ~`), which bounds memory without the cost of exact trimming.
const DEFAULT_MAX_LENGTH: i64 = 100_000;

#[derive(Clone)]
pub struct StreamProducer {
    redis: ConnectionManager,
    stream_name: String,
    max_length: i64,
}

impl StreamProducer {
    pub fn new(redis: ConnectionManager, stream_name: impl Into<String>) -> Self {
        Self {
            redis,
            stream_name: stream_name.into(),
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    /// Producer whose name and cap come from a [`StreamDef`].
    ///
    /// Preferred over [`StreamProducer::new`] wherever a definition exists,
    /// since it cannot drift from the worker reading the stream.
    pub fn from_stream_def<S: StreamDef>(redis: ConnectionManager) -> Self {
        Self {
            redis,
            stream_name: S::STREAM_NAME.to_string(),
            max_length: S::MAX_LENGTH,
        }
    }

    pub fn with_max_length(mut self, max_length: i64) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }

    /// The XADD every append uses, trimming as it goes.
    ///
    /// The payload lands in a single `job` field, which is the layout the
    /// consumer decodes.
    fn append_command(&self, payload: &str) -> redis::Cmd {
        let mut cmd = redis::cmd("XADD");
        cmd.arg(&self.stream_name)
            .arg("MAXLEN")
            .arg("~")
            .arg(self.max_length)
            .arg("*")
            .arg("job")
            .arg(payload);
        cmd
    }

    /// Append one job, returning its stream entry ID.
    pub async fn send<J: Serialize>(&self, job: &J) -> Result<String, StreamError> {
        let payload = serde_json::to_string(job)?;

        let mut conn = self.redis.clone();
        let stream_id: String = self.append_command(&payload).query_async(&mut conn).await?;

        debug!(stream = %self.stream_name, %stream_id, "Job appended");
        Ok(stream_id)
    }

    /// Append several jobs through one pipeline round trip.
    pub async fn send_batch<J: Serialize>(&self, jobs: &[J]) -> Result<Vec<String>, StreamError> {
        if jobs.is_empty() {
            return Ok(vec![]);
        }

        let mut pipe = redis::pipe();
        for job in jobs {
            pipe.add_command(self.append_command(&serde_json::to_string(job)?));
        }

        let mut conn = self.redis.clone();
        let stream_ids: Vec<String> = pipe.query_async(&mut conn).await?;

        debug!(stream = %self.stream_name, count = stream_ids.len(), "Batch appended");
        Ok(stream_ids)
    }

    /// Current number of entries on the stream.
    pub async fn stream_length(&self) -> Result<i64, StreamError> {
        let mut conn = self.redis.clone();
        Ok(conn.xlen(&self.stream_name).await?)
    }
}
