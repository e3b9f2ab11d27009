//! Study and project session stores.
//!
//! Both tables share one layout (`id, <parent>, start_time, end_time,
//! focus_level, notes`), so one generic store serves both.

use super::repository::{Entity, Repository};
use crate::libs::error::{AppError, AppResult, EntityKind};
use crate::libs::session::{ProjectSession, StudySession, Timed};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use std::marker::PhantomData;

/// Table mapping for a session type.
pub trait SessionRecord: Entity + Timed + Sized {
    const TABLE: &'static str;
    const PARENT_COLUMN: &'static str;

    fn parent_id(&self) -> Option<i64>;
    fn focus_level(&self) -> Option<i32>;
    fn notes(&self) -> Option<&str>;
    fn with_id(self, id: i64) -> Self;
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

impl Entity for StudySession {
    const KIND: EntityKind = EntityKind::StudySession;

    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl SessionRecord for StudySession {
    const TABLE: &'static str = "study_sessions";
    const PARENT_COLUMN: &'static str = "task_id";

    fn parent_id(&self) -> Option<i64> {
        self.task_id
    }

    fn focus_level(&self) -> Option<i32> {
        self.focus_level
    }

    fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(StudySession {
            id: row.get(0)?,
            task_id: row.get(1)?,
            start_time: row.get(2)?,
            end_time: row.get(3)?,
            focus_level: row.get(4)?,
            notes: row.get(5)?,
        })
    }
}

impl Entity for ProjectSession {
    const KIND: EntityKind = EntityKind::ProjectSession;

    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl SessionRecord for ProjectSession {
    const TABLE: &'static str = "project_sessions";
    const PARENT_COLUMN: &'static str = "project_id";

    fn parent_id(&self) -> Option<i64> {
        Some(self.project_id)
    }

    fn focus_level(&self) -> Option<i32> {
        self.focus_level
    }

    fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(ProjectSession {
            id: row.get(0)?,
            project_id: row.get(1)?,
            start_time: row.get(2)?,
            end_time: row.get(3)?,
            focus_level: row.get(4)?,
            notes: row.get(5)?,
        })
    }
}

pub struct Sessions<'c, S> {
    conn: &'c Connection,
    _record: PhantomData<S>,
}

pub type StudySessions<'c> = Sessions<'c, StudySession>;
pub type ProjectSessions<'c> = Sessions<'c, ProjectSession>;

impl<'c, S: SessionRecord> Sessions<'c, S> {
    pub fn new(conn: &'c Connection) -> Self {
        Sessions {
            conn,
            _record: PhantomData,
        }
    }

    pub fn for_parent(&self, parent_id: i64) -> AppResult<Vec<S>> {
        self.select(&format!("WHERE {} = ?1", S::PARENT_COLUMN), &[&parent_id])
    }

    pub fn started_on(&self, date: NaiveDate) -> AppResult<Vec<S>> {
        self.select("WHERE DATE(start_time) = ?1", &[&date])
    }

    /// Sessions that started within `[from, to]`, both days inclusive.
    pub fn started_between(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<S>> {
        self.select("WHERE DATE(start_time) BETWEEN ?1 AND ?2", &[&from, &to])
    }

    pub fn live(&self) -> AppResult<Vec<S>> {
        self.select("WHERE end_time IS NULL", &[])
    }

    /// Stamps the end time of a live session.
    pub fn close(&self, id: i64, end_time: NaiveDateTime) -> AppResult<S> {
        let sql = format!("UPDATE {} SET end_time = ?2 WHERE id = ?1", S::TABLE);
        let affected = self.conn.execute(&sql, params![id, end_time])?;
        if affected == 0 {
            return Err(AppError::not_found(S::KIND, id));
        }
        self.find_by_id(id)
    }

    fn select(&self, clause: &str, params: &[&dyn ToSql]) -> AppResult<Vec<S>> {
        let sql = format!(
            "SELECT id, {}, start_time, end_time, focus_level, notes FROM {} {} ORDER BY id",
            S::PARENT_COLUMN,
            S::TABLE,
            clause
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let session_iter = stmt.query_map(params, |row| S::from_row(row))?;

        let mut sessions = Vec::new();
        for session in session_iter {
            sessions.push(session?);
        }
        Ok(sessions)
    }
}

impl<S: SessionRecord> Repository<S> for Sessions<'_, S> {
    fn save(&self, session: S) -> AppResult<S> {
        match session.id() {
            None => {
                let sql = format!(
                    "INSERT INTO {} ({}, start_time, end_time, focus_level, notes) VALUES (?1, ?2, ?3, ?4, ?5)",
                    S::TABLE,
                    S::PARENT_COLUMN
                );
                self.conn.execute(
                    &sql,
                    params![session.parent_id(), session.start_time(), session.end_time(), session.focus_level(), session.notes()],
                )?;
                Ok(session.with_id(self.conn.last_insert_rowid()))
            }
            Some(id) => {
                let sql = format!(
                    "UPDATE {} SET {} = ?2, start_time = ?3, end_time = ?4, focus_level = ?5, notes = ?6 WHERE id = ?1",
                    S::TABLE,
                    S::PARENT_COLUMN
                );
                let affected = self.conn.execute(
                    &sql,
                    params![
                        id,
                        session.parent_id(),
                        session.start_time(),
                        session.end_time(),
                        session.focus_level(),
                        session.notes()
                    ],
                )?;
                if affected == 0 {
                    return Err(AppError::not_found(S::KIND, id));
                }
                self.find_by_id(id)
            }
        }
    }

    fn find_by_id(&self, id: i64) -> AppResult<S> {
        let sql = format!(
            "SELECT id, {}, start_time, end_time, focus_level, notes FROM {} WHERE id = ?1",
            S::PARENT_COLUMN,
            S::TABLE
        );
        self.conn
            .query_row(&sql, params![id], |row| S::from_row(row))
            .optional()?
            .ok_or_else(|| AppError::not_found(S::KIND, id))
    }

    fn find_all(&self) -> AppResult<Vec<S>> {
        self.select("", &[])
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", S::TABLE);
        let affected = self.conn.execute(&sql, params![id])?;
        if affected == 0 {
            return Err(AppError::not_found(S::KIND, id));
        }
        Ok(())
    }
}
