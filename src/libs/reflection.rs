use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Free-text note for a day. At most one per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReflection {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub note: String,
    pub mood: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReflectionInput {
    /// Defaults to today when absent.
    pub date: Option<String>,
    pub note: String,
    pub mood: Option<i32>,
}
