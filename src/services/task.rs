use crate::db::categories::Categories;
use crate::db::db::Db;
use crate::db::repository::Repository;
use crate::db::sessions::StudySessions;
use crate::db::tasks::Tasks;
use crate::libs::clock;
use crate::libs::error::{AppError, AppResult};
use crate::libs::kinds::{Priority, TaskStatus};
use crate::libs::session::{SessionInput, StudySession};
use crate::libs::task::{Task, TaskFilter, TaskInput};
use crate::libs::validation::{self, MAX_TITLE_LEN};
use chrono::NaiveDateTime;
use rusqlite::Connection;
use tracing::{debug, info};

#[derive(Clone)]
pub struct TaskService {
    db: Db,
}

impl TaskService {
    pub fn new(db: Db) -> Self {
        TaskService { db }
    }

    pub fn create(&self, input: TaskInput) -> AppResult<Task> {
        let task = build_task(input, None, clock::now())?;
        let task = self.db.transaction(|tx| {
            check_category(tx, task.category_id)?;
            Tasks::new(tx).save(task)
        })?;
        info!(task_id = ?task.id, title = %task.title, "task created");
        Ok(task)
    }

    /// Replaces the task's fields. Absent priority or status keep their
    /// current value.
    pub fn update(&self, id: i64, input: TaskInput) -> AppResult<Task> {
        let now = clock::now();
        // Field checks run before storage is touched.
        build_task(input.clone(), None, now)?;
        let task = self.db.transaction(|tx| {
            let tasks = Tasks::new(tx);
            let existing = tasks.find_by_id(id)?;
            let task = build_task(input, Some(existing), now)?;
            check_category(tx, task.category_id)?;
            tasks.save(task)
        })?;
        info!(task_id = id, "task updated");
        Ok(task)
    }

    pub fn get(&self, id: i64) -> AppResult<Task> {
        self.db.with_conn(|conn| Tasks::new(conn).find_by_id(id))
    }

    pub fn list(&self, filter: TaskFilter) -> AppResult<Vec<Task>> {
        self.db.with_conn(|conn| Tasks::new(conn).fetch(filter))
    }

    /// Any status may follow any other.
    pub fn set_status(&self, id: i64, status: &str) -> AppResult<Task> {
        let status = parse_status(status)?;
        let now = clock::now();
        let task = self.db.transaction(|tx| {
            let tasks = Tasks::new(tx);
            let mut task = tasks.find_by_id(id)?;
            apply_status(&mut task, status, now);
            tasks.save(task)
        })?;
        info!(task_id = id, status = %status, "task status changed");
        Ok(task)
    }

    pub fn delete(&self, id: i64) -> AppResult<()> {
        self.db.with_conn(|conn| Tasks::new(conn).delete(id))?;
        info!(task_id = id, "task deleted");
        Ok(())
    }

    /// Marks the task `DONE` and logs the study session spent on it, in one
    /// transaction. `end_time` defaults to now.
    pub fn complete_with_session(&self, id: i64, input: SessionInput) -> AppResult<(Task, StudySession)> {
        let now = clock::now();
        let start_time = match input.start_time.as_deref() {
            Some(value) => validation::datetime(value, "startTime")?,
            None => return Err(AppError::validation("startTime", "INVALID_DATE", "Field 'startTime' is required")),
        };
        let end_time = match input.end_time.as_deref() {
            Some(value) => validation::datetime(value, "endTime")?,
            None => now,
        };
        validation::time_range(start_time, end_time)?;
        let focus_level = validation::scale(input.focus_level, "focusLevel", "INVALID_FOCUS_LEVEL")?;

        let result = self.db.transaction(|tx| {
            let tasks = Tasks::new(tx);
            let mut task = tasks.find_by_id(id)?;
            apply_status(&mut task, TaskStatus::Done, now);
            let task = tasks.save(task)?;
            debug!(task_id = id, "task marked done, logging session");

            let session = StudySessions::new(tx).save(StudySession {
                id: None,
                task_id: Some(id),
                start_time,
                end_time: Some(end_time),
                focus_level,
                notes: input.notes.clone().filter(|n| !n.trim().is_empty()),
            })?;
            Ok((task, session))
        })?;
        info!(task_id = id, session_id = ?result.1.id, "task completed with session");
        Ok(result)
    }
}

/// Builds a list filter from textual front-end parameters. The first one
/// given wins: status, then category, then due date.
pub fn filter(status: Option<&str>, category_id: Option<i64>, due: Option<&str>) -> AppResult<TaskFilter> {
    if let Some(status) = status {
        return Ok(TaskFilter::Status(parse_status(status)?));
    }
    if let Some(category_id) = category_id {
        return Ok(TaskFilter::Category(category_id));
    }
    match due {
        Some(due) => Ok(TaskFilter::DueOn(validation::date(due, "due")?)),
        None => Ok(TaskFilter::All),
    }
}

fn parse_priority(value: &str) -> AppResult<Priority> {
    value.parse().map_err(|_| {
        AppError::validation("priority", "INVALID_PRIORITY", format!("Priority '{}' is not one of {}", value, Priority::choices()))
    })
}

fn parse_status(value: &str) -> AppResult<TaskStatus> {
    value.parse().map_err(|_| {
        AppError::validation(
            "status",
            "INVALID_STATUS",
            format!("Status '{}' is not one of {}", value, TaskStatus::choices()),
        )
    })
}

/// Keeps `completed_at` in step with the status.
fn apply_status(task: &mut Task, status: TaskStatus, now: NaiveDateTime) {
    match (task.status, status) {
        (TaskStatus::Done, TaskStatus::Done) => {}
        (_, TaskStatus::Done) => task.completed_at = Some(now),
        _ => task.completed_at = None,
    }
    task.status = status;
}

fn build_task(input: TaskInput, existing: Option<Task>, now: NaiveDateTime) -> AppResult<Task> {
    let title = validation::required(&input.title, "title", "TASK_TITLE_REQUIRED")?;
    validation::max_len(&title, MAX_TITLE_LEN, "title", "TASK_TITLE_TOO_LONG")?;

    let priority = match input.priority.as_deref() {
        Some(value) => parse_priority(value)?,
        None => existing.as_ref().map(|t| t.priority).unwrap_or_default(),
    };
    let status = match input.status.as_deref() {
        Some(value) => parse_status(value)?,
        None => existing.as_ref().map(|t| t.status).unwrap_or_default(),
    };
    let deadline = validation::optional_date(input.deadline.as_deref(), "deadline")?;

    let mut task = existing.unwrap_or_else(|| Task::new(&title));
    task.title = title;
    task.description = input.description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty());
    task.category_id = input.category_id;
    task.priority = priority;
    task.deadline = deadline;
    apply_status(&mut task, status, now);
    Ok(task)
}

fn check_category(conn: &Connection, category_id: Option<i64>) -> AppResult<()> {
    if let Some(category_id) = category_id {
        if !Categories::new(conn).exists(category_id)? {
            return Err(AppError::validation(
                "categoryId",
                "INVALID_CATEGORY_REFERENCE",
                format!("Category {} does not exist", category_id),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn build_rejects_bad_fields() {
        let blank = TaskInput::default();
        assert_eq!(build_task(blank, None, now()).unwrap_err().error_code(), "TASK_TITLE_REQUIRED");

        let input = TaskInput {
            title: "Read".into(),
            priority: Some("urgent".into()),
            ..Default::default()
        };
        assert_eq!(build_task(input, None, now()).unwrap_err().error_code(), "INVALID_PRIORITY");

        let input = TaskInput {
            title: "Read".into(),
            deadline: Some("tomorrow".into()),
            ..Default::default()
        };
        assert_eq!(build_task(input, None, now()).unwrap_err().error_code(), "INVALID_DATE");

        let input = TaskInput {
            title: "x".repeat(MAX_TITLE_LEN + 1),
            ..Default::default()
        };
        assert_eq!(build_task(input, None, now()).unwrap_err().error_code(), "TASK_TITLE_TOO_LONG");
    }

    #[test]
    fn filter_prefers_status_and_validates_text() {
        assert!(matches!(filter(Some("done"), Some(1), None).unwrap(), TaskFilter::Status(TaskStatus::Done)));
        assert!(matches!(filter(None, Some(1), Some("2026-03-01")).unwrap(), TaskFilter::Category(1)));
        assert!(matches!(filter(None, None, None).unwrap(), TaskFilter::All));
        assert_eq!(filter(Some("later"), None, None).unwrap_err().error_code(), "INVALID_STATUS");
        assert_eq!(filter(None, None, Some("03/01")).unwrap_err().error_code(), "INVALID_DATE");
    }

    #[test]
    fn completed_at_follows_status() {
        let mut task = Task::new("Read");
        apply_status(&mut task, TaskStatus::Done, now());
        assert_eq!(task.completed_at, Some(now()));

        let later = now() + chrono::Duration::hours(1);
        apply_status(&mut task, TaskStatus::Done, later);
        assert_eq!(task.completed_at, Some(now()));

        apply_status(&mut task, TaskStatus::Pending, later);
        assert_eq!(task.completed_at, None);
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn update_keeps_existing_enums_when_absent() {
        let mut existing = Task::new("Read");
        existing.id = Some(3);
        existing.priority = Priority::High;
        existing.status = TaskStatus::InProgress;

        let input = TaskInput {
            title: "Read more".into(),
            ..Default::default()
        };
        let task = build_task(input, Some(existing), now()).unwrap();
        assert_eq!(task.id, Some(3));
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.status, TaskStatus::InProgress);
    }
}
