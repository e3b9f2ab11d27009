use crate::db::categories::Categories;
use crate::db::db::Db;
use crate::db::repository::Repository;
use crate::db::tasks::Tasks;
use crate::libs::category::{Category, CategoryInput, DEFAULT_COLOR};
use crate::libs::error::{AppError, AppResult};
use crate::libs::validation;
use rusqlite::Connection;
use tracing::info;

#[derive(Clone)]
pub struct CategoryService {
    db: Db,
}

impl CategoryService {
    pub fn new(db: Db) -> Self {
        CategoryService { db }
    }

    pub fn create(&self, input: CategoryInput) -> AppResult<Category> {
        let (name, color) = validate(&input)?;
        let category = self.db.transaction(|tx| {
            ensure_name_free(tx, &name, None)?;
            Categories::new(tx).save(Category::new(&name, &color))
        })?;
        info!(category_id = ?category.id, name = %category.name, "category created");
        Ok(category)
    }

    pub fn update(&self, id: i64, input: CategoryInput) -> AppResult<Category> {
        let (name, color) = validate(&input)?;
        self.db.transaction(|tx| {
            let categories = Categories::new(tx);
            let mut category = categories.find_by_id(id)?;
            ensure_name_free(tx, &name, Some(id))?;
            category.name = name;
            category.color = color;
            categories.save(category)
        })
    }

    pub fn get(&self, id: i64) -> AppResult<Category> {
        self.db.with_conn(|conn| Categories::new(conn).find_by_id(id))
    }

    pub fn get_by_name(&self, name: &str) -> AppResult<Category> {
        self.db
            .with_conn(|conn| Categories::new(conn).get_by_name(name))?
            .ok_or_else(|| AppError::not_found_by(crate::libs::error::EntityKind::Category, name))
    }

    pub fn list(&self) -> AppResult<Vec<Category>> {
        self.db.with_conn(|conn| Categories::new(conn).find_all())
    }

    /// Deletes the category. Tasks and projects that used it stay, with
    /// their category cleared. Returns how many tasks were detached.
    pub fn delete(&self, id: i64) -> AppResult<usize> {
        let detached = self.db.transaction(|tx| {
            let detached = Tasks::new(tx).count_in_category(id)?;
            Categories::new(tx).delete(id)?;
            Ok(detached)
        })?;
        info!(category_id = id, detached_tasks = detached, "category deleted");
        Ok(detached)
    }
}

fn validate(input: &CategoryInput) -> AppResult<(String, String)> {
    let name = validation::required(&input.name, "name", "CATEGORY_NAME_REQUIRED")?;
    let color = match input.color.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_COLOR.to_string(),
        Some(value) => validation::color(value)?,
    };
    Ok((name, color))
}

fn ensure_name_free(conn: &Connection, name: &str, own_id: Option<i64>) -> AppResult<()> {
    if let Some(existing) = Categories::new(conn).get_by_name(name)? {
        if existing.id != own_id {
            return Err(AppError::validation(
                "name",
                "CATEGORY_NAME_TAKEN",
                format!("Category '{}' already exists", name),
            ));
        }
    }
    Ok(())
}
