//! Tasks Domain
//!
//! Task CRUD backed by PostgreSQL, with status changes published to a Redis
//! Stream so the notify worker can email the owner out of band.
//!
//! # Features
//!
//! - Create, read, update, delete, list tasks over HTTP
//! - Status transition detection on update
//! - Fire-and-forget status change events (persistence never waits on Redis)
//! - OpenAPI documentation for every endpoint
//!
//! # Architecture
//!
//! ```text
//! HTTP ──► Handlers ──► Service ──► Repository ──► PostgreSQL
//!                          │
//!                          └──► StreamNotifier ──► tasks:status-changed
//!                                                        │
//!                                          notify worker ┴─► email
//! ```
//!
//! The service compares the stored status with the incoming one; only a real
//! transition reaches the stream.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_tasks::{PgTaskRepository, StreamNotifier, TaskService};
//! use sea_orm::Database;
//!
//! # async fn wire(redis: redis::aio::ConnectionManager) -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//!
//! let repository = PgTaskRepository::new(db);
//! let (notifier, _publisher) = StreamNotifier::start(redis);
//! let service = TaskService::new(repository, std::sync::Arc::new(notifier));
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod events;
pub mod handlers;
pub mod models;
pub mod notifier;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{TaskError, TaskResult};
pub use events::{StatusChangedEvent, StatusChangedStream};
pub use handlers::ApiDoc;
pub use models::{CreateTask, Task, TaskStatus, UpdateTask};
pub use notifier::{ChangeNotifier, StreamNotifier};
pub use postgres::PgTaskRepository;
pub use repository::TaskRepository;
pub use service::TaskService;
