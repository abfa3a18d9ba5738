//! Database row mapping for the tasks table.

use crate::models::TaskStatus;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub user_id: i64,
    pub status: TaskStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Task {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            user_id: model.user_id,
            status: model.status,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<crate::models::CreateTask> for ActiveModel {
    fn from(input: crate::models::CreateTask) -> Self {
        // UUIDv7 keys give the table insertion-ordered ids
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        ActiveModel {
            id: Set(Uuid::now_v7()),
            title: Set(input.title),
            description: Set(input.description),
            user_id: Set(input.user_id),
            status: Set(input.status),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

impl From<crate::models::Task> for ActiveModel {
    fn from(task: crate::models::Task) -> Self {
        ActiveModel {
            id: Set(task.id),
            title: Set(task.title),
            description: Set(task.description),
            user_id: Set(task.user_id),
            status: Set(task.status),
            created_at: Set(task.created_at.into()),
            updated_at: Set(task.updated_at.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateTask;

    #[test]
    fn test_create_task_becomes_active_model() {
        let input = CreateTask {
            title: "write report".to_string(),
            description: None,
            user_id: 7,
            status: TaskStatus::New,
        };

        let active: ActiveModel = input.into();

        let id = active.id.unwrap();
        assert_eq!(id.get_version_num(), 7);
        assert_eq!(active.title.unwrap(), "write report");
        assert_eq!(active.status.unwrap(), TaskStatus::New);
        assert_eq!(active.created_at.unwrap(), active.updated_at.unwrap());
    }
}
