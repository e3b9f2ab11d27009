use super::repository::{Entity, Repository};
use crate::libs::clock;
use crate::libs::error::{AppError, AppResult, EntityKind};
use crate::libs::kinds::ProjectStatus;
use crate::libs::project::Project;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};

const PROJECT_COLUMNS: &str = "id, name, description, status, category_id, created_at";
const INSERT_PROJECT: &str = "INSERT INTO projects (name, description, status, category_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5)";
const UPDATE_PROJECT: &str = "UPDATE projects SET name = ?2, description = ?3, status = ?4, category_id = ?5 WHERE id = ?1";
const DELETE_PROJECT: &str = "DELETE FROM projects WHERE id = ?1";

impl Entity for Project {
    const KIND: EntityKind = EntityKind::Project;

    fn id(&self) -> Option<i64> {
        self.id
    }
}

pub struct Projects<'c> {
    conn: &'c Connection,
}

impl<'c> Projects<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Projects { conn }
    }

    pub fn by_status(&self, status: ProjectStatus) -> AppResult<Vec<Project>> {
        self.select("WHERE status = ?1", &[&status])
    }

    fn select(&self, clause: &str, params: &[&dyn ToSql]) -> AppResult<Vec<Project>> {
        let sql = format!("SELECT {} FROM projects {} ORDER BY id", PROJECT_COLUMNS, clause);
        let mut stmt = self.conn.prepare(&sql)?;
        let project_iter = stmt.query_map(params, map_project)?;

        let mut projects = Vec::new();
        for project in project_iter {
            projects.push(project?);
        }
        Ok(projects)
    }
}

impl Repository<Project> for Projects<'_> {
    fn save(&self, mut project: Project) -> AppResult<Project> {
        match project.id {
            None => {
                let created_at = project.created_at.unwrap_or_else(clock::now);
                self.conn.execute(
                    INSERT_PROJECT,
                    params![project.name, project.description, project.status, project.category_id, created_at],
                )?;
                project.id = Some(self.conn.last_insert_rowid());
                project.created_at = Some(created_at);
                Ok(project)
            }
            Some(id) => {
                let affected = self.conn.execute(
                    UPDATE_PROJECT,
                    params![id, project.name, project.description, project.status, project.category_id],
                )?;
                if affected == 0 {
                    return Err(AppError::not_found(EntityKind::Project, id));
                }
                self.find_by_id(id)
            }
        }
    }

    fn find_by_id(&self, id: i64) -> AppResult<Project> {
        let sql = format!("SELECT {} FROM projects WHERE id = ?1", PROJECT_COLUMNS);
        self.conn
            .query_row(&sql, params![id], map_project)
            .optional()?
            .ok_or_else(|| AppError::not_found(EntityKind::Project, id))
    }

    fn find_all(&self) -> AppResult<Vec<Project>> {
        self.select("", &[])
    }

    /// Project sessions are removed with the project (`ON DELETE CASCADE`).
    fn delete(&self, id: i64) -> AppResult<()> {
        let affected = self.conn.execute(DELETE_PROJECT, params![id])?;
        if affected == 0 {
            return Err(AppError::not_found(EntityKind::Project, id));
        }
        Ok(())
    }
}

fn map_project(row: &Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        status: row.get(3)?,
        category_id: row.get(4)?,
        created_at: row.get(5)?,
    })
}
