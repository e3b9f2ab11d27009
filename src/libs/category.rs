use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COLOR: &str = "#3498db";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
    pub color: String,
    pub created_at: Option<NaiveDateTime>,
}

impl Category {
    pub fn new(name: &str, color: &str) -> Self {
        Category {
            id: None,
            name: name.to_string(),
            color: color.to_string(),
            created_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryInput {
    pub name: String,
    pub color: Option<String>,
}
