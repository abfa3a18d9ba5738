use async_trait::async_trait;
use uuid::Uuid;

use crate::error::TaskResult;
use crate::models::{CreateTask, Task, UpdateTask};

/// Persistence seam for tasks.
///
/// The service talks to storage only through this trait; tests substitute
/// the generated mock, production wires in [`crate::PgTaskRepository`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Persist a new task and return it with its generated id.
    async fn create(&self, input: CreateTask) -> TaskResult<Task>;

    /// Fetch one task, None when no row has that id.
    async fn get_by_id(&self, id: Uuid) -> TaskResult<Option<Task>>;

    /// Every task, ordered by id.
    async fn list(&self) -> TaskResult<Vec<Task>>;

    /// Replace a task's mutable fields, None when no row has that id.
    async fn update(&self, id: Uuid, input: UpdateTask) -> TaskResult<Option<Task>>;

    /// Remove a task, reporting whether a row was actually deleted.
    async fn delete(&self, id: Uuid) -> TaskResult<bool>;
}
