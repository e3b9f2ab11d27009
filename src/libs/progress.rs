use chrono::NaiveDate;
use serde::Serialize;

/// One day's snapshot across tasks, sessions and reflections.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub tasks_due: usize,
    pub tasks_due_done: usize,
    pub tasks_completed: usize,
    pub study_sessions: usize,
    pub study_minutes: i64,
    pub project_minutes: i64,
    pub has_reflection: bool,
}

impl DailyProgress {
    /// Share of the tasks due that day which are done, in percent.
    pub fn completion_rate(&self) -> f64 {
        if self.tasks_due == 0 {
            return 0.0;
        }
        (self.tasks_due_done as f64 / self.tasks_due as f64) * 100.0
    }
}
