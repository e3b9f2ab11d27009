use super::repository::{Entity, Repository};
use crate::libs::clock;
use crate::libs::error::{AppError, AppResult, EntityKind};
use crate::libs::kinds::TaskStatus;
use crate::libs::task::{Task, TaskFilter};
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};

const TASK_COLUMNS: &str = "id, title, description, category_id, priority, deadline, status, created_at, completed_at";
const INSERT_TASK: &str = "INSERT INTO tasks (title, description, category_id, priority, deadline, status, created_at, completed_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const UPDATE_TASK: &str = "UPDATE tasks SET title = ?2, description = ?3, category_id = ?4, priority = ?5, deadline = ?6, status = ?7, completed_at = ?8
    WHERE id = ?1";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";
const WHERE_ID: &str = "WHERE id = ?1";
const WHERE_STATUS: &str = "WHERE status = ?1";
const WHERE_CATEGORY: &str = "WHERE category_id = ?1";
const WHERE_DEADLINE: &str = "WHERE deadline = ?1";
const WHERE_COMPLETED_ON: &str = "WHERE DATE(completed_at) = ?1";
const ORDER_BY_ID: &str = "ORDER BY id";

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Task;

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// Task store over a borrowed connection or transaction.
pub struct Tasks<'c> {
    conn: &'c Connection,
}

impl<'c> Tasks<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Tasks { conn }
    }

    pub fn fetch(&self, filter: TaskFilter) -> AppResult<Vec<Task>> {
        match filter {
            TaskFilter::All => self.select("", &[]),
            TaskFilter::Status(status) => self.select(WHERE_STATUS, &[&status]),
            TaskFilter::Category(category_id) => self.select(WHERE_CATEGORY, &[&category_id]),
            TaskFilter::DueOn(date) => self.select(WHERE_DEADLINE, &[&date]),
        }
    }

    pub fn completed_on(&self, date: chrono::NaiveDate) -> AppResult<Vec<Task>> {
        self.select(WHERE_COMPLETED_ON, &[&date])
    }

    pub fn count_in_category(&self, category_id: i64) -> AppResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tasks WHERE category_id = ?1", params![category_id], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn select(&self, clause: &str, params: &[&dyn ToSql]) -> AppResult<Vec<Task>> {
        let sql = format!("SELECT {} FROM tasks {} {}", TASK_COLUMNS, clause, ORDER_BY_ID);
        let mut stmt = self.conn.prepare(&sql)?;
        let task_iter = stmt.query_map(params, map_task)?;

        let mut tasks = Vec::new();
        for task in task_iter {
            tasks.push(task?);
        }
        Ok(tasks)
    }
}

impl Repository<Task> for Tasks<'_> {
    fn save(&self, mut task: Task) -> AppResult<Task> {
        match task.id {
            None => {
                let created_at = task.created_at.unwrap_or_else(clock::now);
                self.conn.execute(
                    INSERT_TASK,
                    params![
                        task.title,
                        task.description,
                        task.category_id,
                        task.priority,
                        task.deadline,
                        task.status,
                        created_at,
                        task.completed_at
                    ],
                )?;
                task.id = Some(self.conn.last_insert_rowid());
                task.created_at = Some(created_at);
                Ok(task)
            }
            Some(id) => {
                let affected = self.conn.execute(
                    UPDATE_TASK,
                    params![
                        id,
                        task.title,
                        task.description,
                        task.category_id,
                        task.priority,
                        task.deadline,
                        task.status,
                        task.completed_at
                    ],
                )?;
                if affected == 0 {
                    return Err(AppError::not_found(EntityKind::Task, id));
                }
                self.find_by_id(id)
            }
        }
    }

    fn find_by_id(&self, id: i64) -> AppResult<Task> {
        let sql = format!("SELECT {} FROM tasks {}", TASK_COLUMNS, WHERE_ID);
        self.conn
            .query_row(&sql, params![id], map_task)
            .optional()?
            .ok_or_else(|| AppError::not_found(EntityKind::Task, id))
    }

    fn find_all(&self) -> AppResult<Vec<Task>> {
        self.fetch(TaskFilter::All)
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let affected = self.conn.execute(DELETE_TASK, params![id])?;
        if affected == 0 {
            return Err(AppError::not_found(EntityKind::Task, id));
        }
        Ok(())
    }
}

fn map_task(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category_id: row.get(3)?,
        priority: row.get(4)?,
        deadline: row.get(5)?,
        status: row.get::<_, TaskStatus>(6)?,
        created_at: row.get(7)?,
        completed_at: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::db::Db;
    use crate::libs::kinds::Priority;

    #[test]
    fn save_twice_updates_in_place() {
        let db = Db::in_memory().unwrap();
        db.with_conn(|conn| {
            let tasks = Tasks::new(conn);
            let mut task = tasks.save(Task::new("Read chapter 1"))?;
            let id = task.id;

            task.title = "Read chapter 2".to_string();
            task.priority = Priority::High;
            let task = tasks.save(task)?;

            assert_eq!(task.id, id);
            let fetched = tasks.find_by_id(id.unwrap())?;
            assert_eq!(fetched.title, "Read chapter 2");
            assert_eq!(fetched.priority, Priority::High);
            assert_eq!(tasks.find_all()?.len(), 1);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn missing_ids_are_not_found() {
        let db = Db::in_memory().unwrap();
        db.with_conn(|conn| {
            let tasks = Tasks::new(conn);
            assert_eq!(tasks.find_by_id(99).unwrap_err().error_code(), "TASK_NOT_FOUND");
            assert_eq!(tasks.delete(99).unwrap_err().error_code(), "TASK_NOT_FOUND");

            let mut ghost = Task::new("ghost");
            ghost.id = Some(99);
            assert!(tasks.save(ghost).unwrap_err().is_not_found());
            assert!(!tasks.exists(99)?);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn fetch_by_status_keeps_creation_order() {
        let db = Db::in_memory().unwrap();
        db.with_conn(|conn| {
            let tasks = Tasks::new(conn);
            for title in ["a", "b", "c"] {
                let mut task = Task::new(title);
                if title != "b" {
                    task.status = TaskStatus::Done;
                }
                tasks.save(task)?;
            }
            let done: Vec<String> = tasks.fetch(TaskFilter::Status(TaskStatus::Done))?.into_iter().map(|t| t.title).collect();
            assert_eq!(done, vec!["a", "c"]);
            Ok(())
        })
        .unwrap();
    }
}
