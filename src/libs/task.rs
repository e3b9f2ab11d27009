use super::kinds::{Priority, TaskStatus};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub priority: Priority,
    pub deadline: Option<NaiveDate>,
    pub status: TaskStatus,
    pub created_at: Option<NaiveDateTime>,
    /// Set while the task is `DONE`.
    pub completed_at: Option<NaiveDateTime>,
}

impl Task {
    pub fn new(title: &str) -> Self {
        Task {
            id: None,
            title: title.to_string(),
            description: None,
            category_id: None,
            priority: Priority::default(),
            deadline: None,
            status: TaskStatus::default(),
            created_at: None,
            completed_at: None,
        }
    }
}

/// Unvalidated task fields as they arrive from the CLI or a JSON body.
///
/// Enum and date fields stay textual so that a bad value surfaces as a
/// field-specific validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskInput {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub priority: Option<String>,
    pub deadline: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone)]
pub enum TaskFilter {
    All,
    Status(TaskStatus),
    Category(i64),
    DueOn(NaiveDate),
}
