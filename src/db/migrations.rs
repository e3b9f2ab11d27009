//! Database schema migration management and versioning system.
//!
//! Migrations are ordered by version, applied inside a single transaction at
//! open time and recorded in the `migrations` table.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use studydesk::db::db::Db;
//! use studydesk::db::migrations::{get_db_version, MigrationManager};
//!
//! let mut conn = Db::new_without_migrations("studydesk.db")?;
//! MigrationManager::new().run_migrations(&mut conn)?;
//! let version = get_db_version(&conn)?;
//! # Ok::<(), studydesk::libs::error::AppError>(())
//! ```

use crate::libs::error::{AppError, AppResult};
use crate::libs::messages::Message;
use crate::{msg_debug, msg_error};
use rusqlite::{params, Connection, Transaction};

/// SQL schema for the migrations tracking table.
const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> rusqlite::Result<()>,
}

/// Registry of every schema change, in version order.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: categories, tasks and the study sessions logged against them
        self.add_migration(1, "create_core_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS categories (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL UNIQUE,
                    color TEXT NOT NULL,
                    created_at TIMESTAMP NOT NULL
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS tasks (
                    id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    description TEXT,
                    category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
                    priority TEXT NOT NULL DEFAULT 'MEDIUM',
                    deadline DATE,
                    status TEXT NOT NULL DEFAULT 'PENDING',
                    created_at TIMESTAMP NOT NULL,
                    completed_at TIMESTAMP
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS study_sessions (
                    id INTEGER PRIMARY KEY,
                    task_id INTEGER REFERENCES tasks(id) ON DELETE SET NULL,
                    start_time TIMESTAMP NOT NULL,
                    end_time TIMESTAMP,
                    focus_level INTEGER,
                    notes TEXT,
                    CHECK (end_time IS NULL OR end_time >= start_time)
                )",
                [],
            )?;
            Ok(())
        });

        // Version 2: projects own their sessions, which go away with them
        self.add_migration(2, "add_projects", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS projects (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    description TEXT,
                    status TEXT NOT NULL DEFAULT 'ACTIVE',
                    category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
                    created_at TIMESTAMP NOT NULL
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS project_sessions (
                    id INTEGER PRIMARY KEY,
                    project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                    start_time TIMESTAMP NOT NULL,
                    end_time TIMESTAMP,
                    focus_level INTEGER,
                    notes TEXT,
                    CHECK (end_time IS NULL OR end_time >= start_time)
                )",
                [],
            )?;
            Ok(())
        });

        // Version 3: goals and one reflection per day
        self.add_migration(3, "add_goals_and_reflections", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS study_goals (
                    id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    start_date DATE NOT NULL,
                    end_date DATE NOT NULL,
                    metric TEXT NOT NULL,
                    target INTEGER NOT NULL,
                    progress INTEGER NOT NULL DEFAULT 0,
                    created_at TIMESTAMP NOT NULL
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS daily_reflections (
                    id INTEGER PRIMARY KEY,
                    date DATE NOT NULL UNIQUE,
                    note TEXT NOT NULL,
                    mood INTEGER
                )",
                [],
            )?;
            Ok(())
        });

        // Version 4: indices for the lookups services run most
        self.add_migration(4, "add_indices", |tx| {
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_category ON tasks(category_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_deadline ON tasks(deadline)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_study_sessions_start ON study_sessions(start_time)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_study_sessions_task ON study_sessions(task_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_project_sessions_project ON project_sessions(project_id)", [])?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> rusqlite::Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every pending migration in one transaction.
    pub fn run_migrations(&self, conn: &mut Connection) -> AppResult<()> {
        conn.execute(MIGRATIONS_TABLE, []).map_err(|e| AppError::migration(0, e))?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;

        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            if let Err(e) = (migration.up)(&tx) {
                msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                return Err(AppError::migration(migration.version, e));
            }

            tx.execute(
                "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                params![migration.version, migration.name],
            )
            .map_err(|e| AppError::migration(migration.version, e))?;
        }

        tx.commit()?;
        msg_debug!(Message::AllMigrationsCompleted);

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> AppResult<u32> {
        if !has_migrations_table(conn)? {
            return Ok(0);
        }
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))?;
        Ok(version.unwrap_or(0))
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> AppResult<bool> {
        if !has_migrations_table(conn)? {
            return Ok(false);
        }
        let count: i32 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// (version, name, applied_at) for every applied migration.
    pub fn get_migration_history(&self, conn: &Connection) -> AppResult<Vec<(u32, String, String)>> {
        if !has_migrations_table(conn)? {
            return Ok(Vec::new());
        }
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;

        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }
}

fn has_migrations_table(conn: &Connection) -> AppResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'migrations'",
        [],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn get_db_version(conn: &Connection) -> AppResult<u32> {
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> AppResult<bool> {
    let manager = MigrationManager::new();
    let current = manager.get_current_version(conn)?;
    Ok(current < manager.latest_version())
}
