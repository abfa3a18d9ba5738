//! Redis Streams job processing.
//!
//! The pieces fit together like this: a [`StreamDef`] names a stream once
//! for everyone, a [`StreamProducer`] appends serialized jobs to it, and a
//! [`StreamWorker`] reads them through a consumer group and feeds each one
//! to a [`StreamProcessor`].
//!
//! Delivery is at least once. A batch is acknowledged only after every
//! entry in it has been handled, so a crash mid-batch redelivers the whole
//! batch rather than losing work. Jobs that keep failing move to a dead
//! letter stream once their retry budget is spent, and entries stranded by
//! a dead consumer are claimed back after an idle timeout.
//!
//! ## Example
//!
//! ```ignore
//! use stream_worker::{StreamWorker, WorkerConfig};
//!
//! let config = WorkerConfig::from_stream_def::<StatusChangedStream>();
//! let worker = StreamWorker::<StatusChangedEvent, _>::new(redis, processor, config);
//! worker.run(shutdown_rx).await?;
//! ```

mod config;
mod consumer;
mod error;
mod event;
mod producer;
mod registry;
mod worker;

pub use config::WorkerConfig;
pub use consumer::{ReadBatch, StreamConsumer, StreamInfo};
pub use error::{ErrorCategory, StreamError};
pub use event::StreamEvent;
pub use producer::StreamProducer;
pub use registry::StreamDef;
pub use worker::{StreamJob, StreamProcessor, StreamWorker};
