//! A job as read off the stream, together with its entry metadata.

use crate::worker::StreamJob;
use chrono::{DateTime, Utc};

/// One stream entry: the decoded job plus where and when it was appended.
#[derive(Debug, Clone)]
pub struct StreamEvent<J: StreamJob> {
    /// Entry ID in Redis, `<millis>-<seq>` form.
    pub stream_id: String,
    /// The decoded payload.
    pub job: J,
    /// Append time, recovered from the entry ID.
    pub timestamp: DateTime<Utc>,
}

impl<J: StreamJob> StreamEvent<J> {
    pub fn new(stream_id: String, job: J) -> Self {
        let timestamp = append_time(&stream_id);
        Self {
            stream_id,
            job,
            timestamp,
        }
    }

    pub fn job_id(&self) -> String {
        self.job.job_id()
    }

    /// Milliseconds the entry has spent on the stream.
    pub fn age_ms(&self) -> i64 {
        (Utc::now() - self.timestamp).num_milliseconds()
    }
}

/// Extracts the millisecond clock from a stream entry ID.
///
/// Falls back to the current time for IDs that do not follow the
/// `<millis>-<seq>` convention, so ages never go wildly negative.
fn append_time(stream_id: &str) -> DateTime<Utc> {
    stream_id
        .split('-')
        .next()
        .and_then(|millis| millis.parse::<i64>().ok())
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_else(Utc::now)
}
