use super::kinds::ProjectStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub category_id: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
}

impl Project {
    pub fn new(name: &str) -> Self {
        Project {
            id: None,
            name: name.to_string(),
            description: None,
            status: ProjectStatus::default(),
            category_id: None,
            created_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectInput {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub category_id: Option<i64>,
}
