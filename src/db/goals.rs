use super::repository::{Entity, Repository};
use crate::libs::clock;
use crate::libs::error::{AppError, AppResult, EntityKind};
use crate::libs::goal::StudyGoal;
use rusqlite::{params, Connection, OptionalExtension, Row};

const GOAL_COLUMNS: &str = "id, title, start_date, end_date, metric, target, progress, created_at";
const INSERT_GOAL: &str = "INSERT INTO study_goals (title, start_date, end_date, metric, target, progress, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const UPDATE_GOAL: &str = "UPDATE study_goals SET title = ?2, start_date = ?3, end_date = ?4, metric = ?5, target = ?6, progress = ?7
    WHERE id = ?1";
const UPDATE_PROGRESS: &str = "UPDATE study_goals SET progress = ?2 WHERE id = ?1";
const DELETE_GOAL: &str = "DELETE FROM study_goals WHERE id = ?1";

impl Entity for StudyGoal {
    const KIND: EntityKind = EntityKind::StudyGoal;

    fn id(&self) -> Option<i64> {
        self.id
    }
}

pub struct Goals<'c> {
    conn: &'c Connection,
}

impl<'c> Goals<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Goals { conn }
    }

    pub fn set_progress(&self, id: i64, progress: i64) -> AppResult<StudyGoal> {
        let affected = self.conn.execute(UPDATE_PROGRESS, params![id, progress])?;
        if affected == 0 {
            return Err(AppError::not_found(EntityKind::StudyGoal, id));
        }
        self.find_by_id(id)
    }
}

impl Repository<StudyGoal> for Goals<'_> {
    fn save(&self, mut goal: StudyGoal) -> AppResult<StudyGoal> {
        match goal.id {
            None => {
                let created_at = goal.created_at.unwrap_or_else(clock::now);
                self.conn.execute(
                    INSERT_GOAL,
                    params![goal.title, goal.start_date, goal.end_date, goal.metric, goal.target, goal.progress, created_at],
                )?;
                goal.id = Some(self.conn.last_insert_rowid());
                goal.created_at = Some(created_at);
                Ok(goal)
            }
            Some(id) => {
                let affected = self.conn.execute(
                    UPDATE_GOAL,
                    params![id, goal.title, goal.start_date, goal.end_date, goal.metric, goal.target, goal.progress],
                )?;
                if affected == 0 {
                    return Err(AppError::not_found(EntityKind::StudyGoal, id));
                }
                self.find_by_id(id)
            }
        }
    }

    fn find_by_id(&self, id: i64) -> AppResult<StudyGoal> {
        let sql = format!("SELECT {} FROM study_goals WHERE id = ?1", GOAL_COLUMNS);
        self.conn
            .query_row(&sql, params![id], map_goal)
            .optional()?
            .ok_or_else(|| AppError::not_found(EntityKind::StudyGoal, id))
    }

    fn find_all(&self) -> AppResult<Vec<StudyGoal>> {
        let sql = format!("SELECT {} FROM study_goals ORDER BY id", GOAL_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let goal_iter = stmt.query_map([], map_goal)?;

        let mut goals = Vec::new();
        for goal in goal_iter {
            goals.push(goal?);
        }
        Ok(goals)
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let affected = self.conn.execute(DELETE_GOAL, params![id])?;
        if affected == 0 {
            return Err(AppError::not_found(EntityKind::StudyGoal, id));
        }
        Ok(())
    }
}

fn map_goal(row: &Row) -> rusqlite::Result<StudyGoal> {
    Ok(StudyGoal {
        id: row.get(0)?,
        title: row.get(1)?,
        start_date: row.get(2)?,
        end_date: row.get(3)?,
        metric: row.get(4)?,
        target: row.get(5)?,
        progress: row.get(6)?,
        created_at: row.get(7)?,
    })
}
