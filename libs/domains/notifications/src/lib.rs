//! Status Change Notifications
//!
//! This crate turns task status change events into plain text emails. It is
//! consumed by the notification worker binary, which runs the processor
//! inside a generic stream worker.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────┐
//! │      Redis Stream      │  ← tasks:status-changed
//! └───────────┬────────────┘
//!             │
//! ┌───────────▼────────────┐
//! │ StatusChangedProcessor │  ← one synchronous send per event
//! └───────────┬────────────┘
//!             │
//! ┌───────────▼────────────┐
//! │     StatusNotifier     │  ← fixed subject and body
//! └───────────┬────────────┘
//!             │
//! ┌───────────▼────────────┐
//! │     EmailProvider      │  ← SMTP relay, MailHog, or mock
//! └────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_notifications::{SmtpProvider, StatusChangedProcessor, StatusNotifier};
//! use domain_tasks::{StatusChangedEvent, StatusChangedStream};
//! use stream_worker::{StreamWorker, WorkerConfig};
//!
//! let provider = SmtpProvider::from_env()?;
//! let processor = StatusChangedProcessor::new(provider, StatusNotifier::from_env());
//!
//! let config = WorkerConfig::from_stream_def::<StatusChangedStream>();
//! let worker = StreamWorker::<StatusChangedEvent, _>::new(redis, processor, config);
//! worker.run(shutdown_rx).await?;
//! ```

pub mod error;
pub mod mailer;
pub mod models;
pub mod processor;
pub mod providers;

// Re-export commonly used types
pub use error::{EmailError, EmailResult};
pub use mailer::StatusNotifier;
pub use models::Email;
pub use processor::StatusChangedProcessor;
pub use providers::{EmailProvider, MockSmtpProvider, SendResult, SmtpConfig, SmtpProvider};
