//! Failure types, and how each kind steers the retry loop.

use thiserror::Error;

/// What the worker should do with a job after this failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Might succeed next time; requeue with a bumped retry count.
    Transient,
    /// Will never succeed; dead letter it without burning retries.
    Permanent,
    /// Retryable, and a signal to the caller to slow down.
    RateLimited,
}

impl ErrorCategory {
    pub fn should_retry(&self) -> bool {
        !matches!(self, ErrorCategory::Permanent)
    }
}

/// Anything that can go wrong between reading an entry and acking it.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("redis command failed: {0}")]
    Redis(#[from] redis::RedisError),

    /// A payload that does not decode. Retrying cannot fix these.
    #[error("json payload: {0}")]
    Serialization(String),

    /// The processor rejected the job; the category decides what happens.
    #[error("job processing failed: {message}")]
    Processing {
        message: String,
        category: ErrorCategory,
    },

    #[error("bad worker configuration: {0}")]
    Config(String),
}

impl StreamError {
    pub fn transient(message: impl Into<String>) -> Self {
        StreamError::Processing {
            message: message.into(),
            category: ErrorCategory::Transient,
        }
    }

    pub fn permanent(message: impl Into<String>) -> Self {
        StreamError::Processing {
            message: message.into(),
            category: ErrorCategory::Permanent,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        StreamError::Processing {
            message: message.into(),
            category: ErrorCategory::RateLimited,
        }
    }

    /// Redis hiccups are worth retrying; bad payloads and bad config are
    /// not. Processing failures carry their own verdict.
    pub fn category(&self) -> ErrorCategory {
        match self {
            StreamError::Redis(_) => ErrorCategory::Transient,
            StreamError::Serialization(_) => ErrorCategory::Permanent,
            StreamError::Processing { category, .. } => *category,
            StreamError::Config(_) => ErrorCategory::Permanent,
        }
    }
}

impl From<serde_json::Error> for StreamError {
    fn from(err: serde_json::Error) -> Self {
        StreamError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_permanent_skips_retry() {
        assert!(ErrorCategory::Transient.should_retry());
        assert!(ErrorCategory::RateLimited.should_retry());
        assert!(!ErrorCategory::Permanent.should_retry());
    }

    #[test]
    fn test_constructors_carry_their_category() {
        assert_eq!(
            StreamError::transient("t").category(),
            ErrorCategory::Transient
        );
        assert_eq!(
            StreamError::permanent("p").category(),
            ErrorCategory::Permanent
        );
        assert_eq!(
            StreamError::rate_limited("r").category(),
            ErrorCategory::RateLimited
        );
    }

    #[test]
    fn test_categories_of_infrastructure_errors() {
        let undecodable: StreamError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert_eq!(undecodable.category(), ErrorCategory::Permanent);

        let misconfigured = StreamError::Config("missing stream name".into());
        assert_eq!(misconfigured.category(), ErrorCategory::Permanent);
    }

    #[test]
    fn test_display_includes_the_message() {
        let err = StreamError::transient("connection reset");
        assert_eq!(err.to_string(), "job processing failed: connection reset");
    }
}
