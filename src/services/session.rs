use crate::db::db::Db;
use crate::db::repository::Repository;
use crate::db::sessions::StudySessions;
use crate::db::tasks::Tasks;
use crate::libs::clock;
use crate::libs::error::{AppError, AppResult};
use crate::libs::session::{SessionInput, StudySession, Timed};
use crate::libs::validation;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use tracing::info;

/// Study sessions, optionally attached to a task.
#[derive(Clone)]
pub struct SessionService {
    db: Db,
}

impl SessionService {
    pub fn new(db: Db) -> Self {
        SessionService { db }
    }

    /// Records a closed session. Both times are required.
    pub fn log(&self, input: SessionInput) -> AppResult<StudySession> {
        let start_time = required_time(input.start_time.as_deref(), "startTime")?;
        let end_time = required_time(input.end_time.as_deref(), "endTime")?;
        validation::time_range(start_time, end_time)?;
        let session = build_session(&input, start_time, Some(end_time))?;

        let session = self.db.with_conn(|conn| {
            check_task(conn, session.task_id)?;
            StudySessions::new(conn).save(session)
        })?;
        info!(session_id = ?session.id, task_id = ?session.task_id, "study session logged");
        Ok(session)
    }

    /// Opens a live session starting at the given time or now.
    pub fn start(&self, input: SessionInput) -> AppResult<StudySession> {
        let start_time = match input.start_time.as_deref() {
            Some(value) => validation::datetime(value, "startTime")?,
            None => clock::now(),
        };
        let session = build_session(&input, start_time, None)?;

        let session = self.db.with_conn(|conn| {
            check_task(conn, session.task_id)?;
            StudySessions::new(conn).save(session)
        })?;
        info!(session_id = ?session.id, "study session started");
        Ok(session)
    }

    pub fn stop(&self, id: i64, end_time: Option<NaiveDateTime>) -> AppResult<StudySession> {
        let end_time = end_time.unwrap_or_else(clock::now);
        let session = self.db.transaction(|tx| {
            let sessions = StudySessions::new(tx);
            let session = sessions.find_by_id(id)?;
            if !session.is_live() {
                return Err(AppError::validation(
                    "sessionId",
                    "SESSION_ALREADY_CLOSED",
                    format!("Study session {} is already closed", id),
                ));
            }
            validation::time_range(session.start_time, end_time)?;
            sessions.close(id, end_time)
        })?;
        info!(session_id = id, "study session stopped");
        Ok(session)
    }

    pub fn get(&self, id: i64) -> AppResult<StudySession> {
        self.db.with_conn(|conn| StudySessions::new(conn).find_by_id(id))
    }

    pub fn list(&self) -> AppResult<Vec<StudySession>> {
        self.db.with_conn(|conn| StudySessions::new(conn).find_all())
    }

    pub fn for_task(&self, task_id: i64) -> AppResult<Vec<StudySession>> {
        self.db.with_conn(|conn| {
            Tasks::new(conn).find_by_id(task_id)?;
            StudySessions::new(conn).for_parent(task_id)
        })
    }

    pub fn on(&self, date: NaiveDate) -> AppResult<Vec<StudySession>> {
        self.db.with_conn(|conn| StudySessions::new(conn).started_on(date))
    }

    pub fn live(&self) -> AppResult<Vec<StudySession>> {
        self.db.with_conn(|conn| StudySessions::new(conn).live())
    }

    pub fn delete(&self, id: i64) -> AppResult<()> {
        self.db.with_conn(|conn| StudySessions::new(conn).delete(id))?;
        info!(session_id = id, "study session deleted");
        Ok(())
    }
}

fn required_time(value: Option<&str>, field: &'static str) -> AppResult<NaiveDateTime> {
    match value {
        Some(value) => validation::datetime(value, field),
        None => Err(AppError::validation(field, "INVALID_DATE", format!("Field '{}' is required", field))),
    }
}

fn build_session(input: &SessionInput, start_time: NaiveDateTime, end_time: Option<NaiveDateTime>) -> AppResult<StudySession> {
    Ok(StudySession {
        id: None,
        task_id: input.parent_id,
        start_time,
        end_time,
        focus_level: validation::scale(input.focus_level, "focusLevel", "INVALID_FOCUS_LEVEL")?,
        notes: input.notes.clone().map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
    })
}

fn check_task(conn: &Connection, task_id: Option<i64>) -> AppResult<()> {
    if let Some(task_id) = task_id {
        if !Tasks::new(conn).exists(task_id)? {
            return Err(AppError::validation(
                "taskId",
                "INVALID_TASK_REFERENCE",
                format!("Task {} does not exist", task_id),
            ));
        }
    }
    Ok(())
}
