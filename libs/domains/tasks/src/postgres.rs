//! PostgreSQL-backed task storage.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder};
use uuid::Uuid;

use crate::entity;
use crate::error::TaskResult;
use crate::models::{CreateTask, Task, UpdateTask};
use crate::repository::TaskRepository;

pub struct PgTaskRepository {
    db: DatabaseConnection,
}

impl PgTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, input: CreateTask) -> TaskResult<Task> {
        let row = entity::Entity::insert(entity::ActiveModel::from(input))
            .exec_with_returning(&self.db)
            .await?;

        tracing::info!(task_id = %row.id, "Task stored");
        Ok(row.into())
    }

    async fn get_by_id(&self, id: Uuid) -> TaskResult<Option<Task>> {
        let row = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(row.map(Into::into))
    }

    async fn list(&self) -> TaskResult<Vec<Task>> {
        let rows = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: Uuid, input: UpdateTask) -> TaskResult<Option<Task>> {
        let Some(row) = entity::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut task: Task = row.into();
        task.apply_update(input);

        // The row can disappear between the fetch and the write
        let saved = match entity::Entity::update(entity::ActiveModel::from(task))
            .exec(&self.db)
            .await
        {
            Ok(row) => row,
            Err(DbErr::RecordNotUpdated) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(task_id = %id, "Task updated");
        Ok(Some(saved.into()))
    }

    async fn delete(&self, id: Uuid) -> TaskResult<bool> {
        let outcome = entity::Entity::delete_by_id(id).exec(&self.db).await?;
        let removed = outcome.rows_affected > 0;

        if removed {
            tracing::info!(task_id = %id, "Task deleted");
        }
        Ok(removed)
    }
}
