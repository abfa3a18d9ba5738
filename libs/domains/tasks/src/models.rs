use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle state of a task.
///
/// Serialized in SCREAMING_SNAKE_CASE on the wire and snake_case in the
/// database enum.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "task_status")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Nobody has picked the task up yet
    #[default]
    #[sea_orm(string_value = "new")]
    New,
    /// Actively worked on
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    /// Finished, kept for the record
    #[sea_orm(string_value = "done")]
    Done,
}

// Hand-written in place of strum's `EnumString` derive: its generated
// `TryFrom<&str>` collides with the one `DeriveActiveEnum` emits for
// `db_type = "Enum"` in sea-orm 2.0.2. Matches the SCREAMING_SNAKE_CASE
// parsing the derive would produce.
impl std::str::FromStr for TaskStatus {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(TaskStatus::New),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "DONE" => Ok(TaskStatus::Done),
            _ => Err(strum::ParseError::VariantNotFound),
        }
    }
}

/// A task as the API returns it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Task {
    /// Assigned at creation, never changes afterwards
    pub id: Uuid,
    /// Short human label
    pub title: String,
    /// Free-form notes, absent when the task needs none
    pub description: Option<String>,
    /// Owning user
    pub user_id: i64,
    /// Where the task sits in its lifecycle
    pub status: TaskStatus,
    /// Set once when the row is inserted
    pub created_at: DateTime<Utc>,
    /// Touched on every write
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a task.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTask {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
    pub user_id: i64,
    /// Initial status, NEW unless the client says otherwise
    #[serde(default)]
    pub status: TaskStatus,
}

/// Request body for replacing a task.
///
/// Every mutable field is required. A missing description clears the
/// stored one.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateTask {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
    pub user_id: i64,
    pub status: TaskStatus,
}

impl Task {
    /// Replace all mutable fields from an update request
    pub fn apply_update(&mut self, update: UpdateTask) {
        self.title = update.title;
        self.description = update.description;
        self.user_id = update.user_id;
        self.status = update.status;
        self.updated_at = chrono::Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(
            serde_json::from_str::<TaskStatus>("\"DONE\"").unwrap(),
            TaskStatus::Done
        );
    }

    #[test]
    fn test_status_rejects_unknown_values() {
        assert!(serde_json::from_str::<TaskStatus>("\"CANCELLED\"").is_err());
        assert!(serde_json::from_str::<TaskStatus>("\"done\"").is_err());
    }

    #[test]
    fn test_status_display_and_parse() {
        assert_eq!(TaskStatus::InProgress.to_string(), "IN_PROGRESS");
        assert_eq!(
            TaskStatus::from_str("IN_PROGRESS").unwrap(),
            TaskStatus::InProgress
        );
    }

    #[test]
    fn test_create_task_defaults_to_new() {
        let input: CreateTask =
            serde_json::from_str(r#"{"title": "Write docs", "user_id": 7}"#).unwrap();

        assert_eq!(input.status, TaskStatus::New);
        assert_eq!(input.description, None);
    }

    #[test]
    fn test_create_task_honors_client_status() {
        let input: CreateTask =
            serde_json::from_str(r#"{"title": "Write docs", "user_id": 7, "status": "DONE"}"#)
                .unwrap();

        assert_eq!(input.status, TaskStatus::Done);
    }

    #[test]
    fn test_update_task_requires_status() {
        let result = serde_json::from_str::<UpdateTask>(r#"{"title": "Write docs", "user_id": 7}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_update_replaces_all_fields() {
        let mut task = Task {
            id: Uuid::now_v7(),
            title: "Old".to_string(),
            description: Some("old notes".to_string()),
            user_id: 1,
            status: TaskStatus::New,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        task.apply_update(UpdateTask {
            title: "New".to_string(),
            description: None,
            user_id: 2,
            status: TaskStatus::Done,
        });

        assert_eq!(task.title, "New");
        assert_eq!(task.description, None);
        assert_eq!(task.user_id, 2);
        assert_eq!(task.status, TaskStatus::Done);
    }

    #[test]
    fn test_title_validation() {
        use validator::Validate;

        let empty = CreateTask {
            title: String::new(),
            description: None,
            user_id: 1,
            status: TaskStatus::New,
        };
        assert!(empty.validate().is_err());

        let too_long = CreateTask {
            title: "x".repeat(256),
            description: None,
            user_id: 1,
            status: TaskStatus::New,
        };
        assert!(too_long.validate().is_err());
    }
}
