use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::error::{TaskError, TaskResult};
use crate::events::StatusChangedEvent;
use crate::models::{CreateTask, Task, UpdateTask};
use crate::notifier::ChangeNotifier;
use crate::repository::TaskRepository;

/// Business rules for tasks, sitting between the HTTP handlers and storage.
///
/// Owns the one piece of logic storage cannot express: spotting a status
/// transition during update and handing it to the notifier.
#[derive(Clone)]
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
    notifier: Arc<dyn ChangeNotifier>,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R, notifier: Arc<dyn ChangeNotifier>) -> Self {
        Self {
            repository: Arc::new(repository),
            notifier,
        }
    }

    /// Validate and store a new task.
    #[instrument(skip(self, input), fields(task_title = %input.title))]
    pub async fn create_task(&self, input: CreateTask) -> TaskResult<Task> {
        input
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    /// Fetch one task; an absent id surfaces as [`TaskError::NotFound`].
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn get_task(&self, id: Uuid) -> TaskResult<Task> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))
    }

    /// Every task, oldest first.
    pub async fn list_tasks(&self) -> TaskResult<Vec<Task>> {
        self.repository.list().await
    }

    /// Replace a task, publishing an event when its status changed.
    ///
    /// The event is handed off only after the write succeeded, and a
    /// publisher outage never surfaces to the caller.
    #[instrument(skip(self, input), fields(task_id = %id))]
    pub async fn update_task(&self, id: Uuid, input: UpdateTask) -> TaskResult<()> {
        input
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;

        let current = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))?;

        let status_changed = current.status != input.status;
        let new_status = input.status;

        self.repository
            .update(id, input)
            .await?
            .ok_or(TaskError::NotFound(id))?;

        if status_changed {
            info!(status = %new_status, "Task status changed");
            self.notifier
                .notify(StatusChangedEvent::new(id, new_status));
        }

        Ok(())
    }

    /// Remove a task; deleting an absent id is an error, not a no-op.
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn delete_task(&self, id: Uuid) -> TaskResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(TaskError::NotFound(id));
        }

        Ok(())
    }
}
