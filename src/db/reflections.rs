use super::repository::{Entity, Repository};
use crate::libs::error::{AppError, AppResult, EntityKind};
use crate::libs::reflection::DailyReflection;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

const INSERT_REFLECTION: &str = "INSERT INTO daily_reflections (date, note, mood) VALUES (?1, ?2, ?3)";
const UPDATE_REFLECTION: &str = "UPDATE daily_reflections SET date = ?2, note = ?3, mood = ?4 WHERE id = ?1";
const DELETE_REFLECTION: &str = "DELETE FROM daily_reflections WHERE id = ?1";
const SELECT_ALL_REFLECTIONS: &str = "SELECT id, date, note, mood FROM daily_reflections ORDER BY id";
const SELECT_REFLECTION_BY_ID: &str = "SELECT id, date, note, mood FROM daily_reflections WHERE id = ?1";
const SELECT_REFLECTION_BY_DATE: &str = "SELECT id, date, note, mood FROM daily_reflections WHERE date = ?1";

impl Entity for DailyReflection {
    const KIND: EntityKind = EntityKind::DailyReflection;

    fn id(&self) -> Option<i64> {
        self.id
    }
}

pub struct Reflections<'c> {
    conn: &'c Connection,
}

impl<'c> Reflections<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Reflections { conn }
    }

    pub fn get_by_date(&self, date: NaiveDate) -> AppResult<Option<DailyReflection>> {
        self.conn
            .query_row(SELECT_REFLECTION_BY_DATE, params![date], map_reflection)
            .optional()
            .map_err(Into::into)
    }
}

impl Repository<DailyReflection> for Reflections<'_> {
    fn save(&self, mut reflection: DailyReflection) -> AppResult<DailyReflection> {
        match reflection.id {
            None => {
                self.conn.execute(INSERT_REFLECTION, params![reflection.date, reflection.note, reflection.mood])?;
                reflection.id = Some(self.conn.last_insert_rowid());
                Ok(reflection)
            }
            Some(id) => {
                let affected = self
                    .conn
                    .execute(UPDATE_REFLECTION, params![id, reflection.date, reflection.note, reflection.mood])?;
                if affected == 0 {
                    return Err(AppError::not_found(EntityKind::DailyReflection, id));
                }
                self.find_by_id(id)
            }
        }
    }

    fn find_by_id(&self, id: i64) -> AppResult<DailyReflection> {
        self.conn
            .query_row(SELECT_REFLECTION_BY_ID, params![id], map_reflection)
            .optional()?
            .ok_or_else(|| AppError::not_found(EntityKind::DailyReflection, id))
    }

    fn find_all(&self) -> AppResult<Vec<DailyReflection>> {
        let mut stmt = self.conn.prepare(SELECT_ALL_REFLECTIONS)?;
        let reflection_iter = stmt.query_map([], map_reflection)?;

        let mut reflections = Vec::new();
        for reflection in reflection_iter {
            reflections.push(reflection?);
        }
        Ok(reflections)
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let affected = self.conn.execute(DELETE_REFLECTION, params![id])?;
        if affected == 0 {
            return Err(AppError::not_found(EntityKind::DailyReflection, id));
        }
        Ok(())
    }
}

fn map_reflection(row: &Row) -> rusqlite::Result<DailyReflection> {
    Ok(DailyReflection {
        id: row.get(0)?,
        date: row.get(1)?,
        note: row.get(2)?,
        mood: row.get(3)?,
    })
}
