use super::repository::{Entity, Repository};
use crate::libs::category::Category;
use crate::libs::clock;
use crate::libs::error::{AppError, AppResult, EntityKind};
use rusqlite::{params, Connection, OptionalExtension, Row};

const INSERT_CATEGORY: &str = "INSERT INTO categories (name, color, created_at) VALUES (?1, ?2, ?3)";
const UPDATE_CATEGORY: &str = "UPDATE categories SET name = ?2, color = ?3 WHERE id = ?1";
const DELETE_CATEGORY: &str = "DELETE FROM categories WHERE id = ?1";
const SELECT_ALL_CATEGORIES: &str = "SELECT id, name, color, created_at FROM categories ORDER BY id";
const SELECT_CATEGORY_BY_ID: &str = "SELECT id, name, color, created_at FROM categories WHERE id = ?1";
const SELECT_CATEGORY_BY_NAME: &str = "SELECT id, name, color, created_at FROM categories WHERE name = ?1 COLLATE NOCASE";

impl Entity for Category {
    const KIND: EntityKind = EntityKind::Category;

    fn id(&self) -> Option<i64> {
        self.id
    }
}

pub struct Categories<'c> {
    conn: &'c Connection,
}

impl<'c> Categories<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Categories { conn }
    }

    pub fn get_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        self.conn
            .query_row(SELECT_CATEGORY_BY_NAME, params![name], map_category)
            .optional()
            .map_err(Into::into)
    }
}

impl Repository<Category> for Categories<'_> {
    fn save(&self, mut category: Category) -> AppResult<Category> {
        match category.id {
            None => {
                let created_at = category.created_at.unwrap_or_else(clock::now);
                self.conn.execute(INSERT_CATEGORY, params![category.name, category.color, created_at])?;
                category.id = Some(self.conn.last_insert_rowid());
                category.created_at = Some(created_at);
                Ok(category)
            }
            Some(id) => {
                let affected = self.conn.execute(UPDATE_CATEGORY, params![id, category.name, category.color])?;
                if affected == 0 {
                    return Err(AppError::not_found(EntityKind::Category, id));
                }
                self.find_by_id(id)
            }
        }
    }

    fn find_by_id(&self, id: i64) -> AppResult<Category> {
        self.conn
            .query_row(SELECT_CATEGORY_BY_ID, params![id], map_category)
            .optional()?
            .ok_or_else(|| AppError::not_found(EntityKind::Category, id))
    }

    fn find_all(&self) -> AppResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(SELECT_ALL_CATEGORIES)?;
        let category_iter = stmt.query_map([], map_category)?;

        let mut categories = Vec::new();
        for category in category_iter {
            categories.push(category?);
        }
        Ok(categories)
    }

    /// Tasks and projects pointing at the category keep existing with their
    /// reference cleared (`ON DELETE SET NULL`).
    fn delete(&self, id: i64) -> AppResult<()> {
        let affected = self.conn.execute(DELETE_CATEGORY, params![id])?;
        if affected == 0 {
            return Err(AppError::not_found(EntityKind::Category, id));
        }
        Ok(())
    }
}

fn map_category(row: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        created_at: row.get(3)?,
    })
}
