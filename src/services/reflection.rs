use crate::db::db::Db;
use crate::db::reflections::Reflections;
use crate::db::repository::Repository;
use crate::libs::clock;
use crate::libs::error::{AppError, AppResult, EntityKind};
use crate::libs::reflection::{DailyReflection, ReflectionInput};
use crate::libs::validation;
use chrono::NaiveDate;
use tracing::info;

#[derive(Clone)]
pub struct ReflectionService {
    db: Db,
}

impl ReflectionService {
    pub fn new(db: Db) -> Self {
        ReflectionService { db }
    }

    /// Writes the reflection for a day, replacing the existing one if any.
    pub fn write(&self, input: ReflectionInput) -> AppResult<DailyReflection> {
        let date = match input.date.as_deref() {
            Some(value) => validation::date(value, "date")?,
            None => clock::today(),
        };
        let note = validation::required(&input.note, "note", "REFLECTION_NOTE_REQUIRED")?;
        let mood = validation::scale(input.mood, "mood", "INVALID_MOOD")?;

        let reflection = self.db.transaction(|tx| {
            let reflections = Reflections::new(tx);
            let id = reflections.get_by_date(date)?.and_then(|r| r.id);
            reflections.save(DailyReflection { id, date, note, mood })
        })?;
        info!(reflection_id = ?reflection.id, date = %reflection.date, "reflection written");
        Ok(reflection)
    }

    pub fn get(&self, id: i64) -> AppResult<DailyReflection> {
        self.db.with_conn(|conn| Reflections::new(conn).find_by_id(id))
    }

    pub fn get_by_date(&self, date: NaiveDate) -> AppResult<DailyReflection> {
        self.db
            .with_conn(|conn| Reflections::new(conn).get_by_date(date))?
            .ok_or_else(|| AppError::not_found_by(EntityKind::DailyReflection, date.to_string()))
    }

    pub fn list(&self) -> AppResult<Vec<DailyReflection>> {
        self.db.with_conn(|conn| Reflections::new(conn).find_all())
    }

    pub fn delete(&self, id: i64) -> AppResult<()> {
        self.db.with_conn(|conn| Reflections::new(conn).delete(id))
    }
}
