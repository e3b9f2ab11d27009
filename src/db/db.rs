//! Storage handle.
//!
//! `Db` owns one SQLite connection behind a mutex and is shared by cloning.
//! It is built explicitly by the front end and handed to each service; there
//! is no process-wide connection. Every open runs pending migrations.

use super::migrations::MigrationManager;
use crate::libs::error::{AppError, AppResult};
use parking_lot::Mutex;
use rusqlite::{Connection, Transaction};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DB_FILE_NAME: &str = "studydesk.db";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    /// Opens (or creates) the database file and migrates it.
    pub fn open(path: impl AsRef<Path>) -> AppResult<Db> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening database");
        let mut conn = Self::new_without_migrations(path)?;
        MigrationManager::new().run_migrations(&mut conn)?;
        Ok(Db::from_connection(conn))
    }

    /// Private in-memory database, mainly for tests.
    pub fn in_memory() -> AppResult<Db> {
        let mut conn = Connection::open_in_memory().map_err(AppError::connection)?;
        Self::configure(&conn)?;
        MigrationManager::new().run_migrations(&mut conn)?;
        Ok(Db::from_connection(conn))
    }

    /// Raw configured connection with no migrations applied.
    pub fn new_without_migrations(path: impl AsRef<Path>) -> AppResult<Connection> {
        let conn = Connection::open(path).map_err(AppError::connection)?;
        Self::configure(&conn)?;
        Ok(conn)
    }

    /// Default database location inside the application data directory.
    pub fn default_path() -> AppResult<PathBuf> {
        crate::libs::data_storage::DataStorage::new()
            .get_path(DB_FILE_NAME)
            .map_err(|e| AppError::Internal(format!("Cannot resolve data directory: {}", e)))
    }

    fn configure(conn: &Connection) -> AppResult<()> {
        conn.busy_timeout(BUSY_TIMEOUT).map_err(AppError::connection)?;
        conn.pragma_update(None, "foreign_keys", "ON").map_err(AppError::connection)?;
        Ok(())
    }

    fn from_connection(conn: Connection) -> Db {
        Db {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `f` against the connection without a transaction.
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> AppResult<T>) -> AppResult<T> {
        let conn = self.conn.lock();
        f(&conn)
    }

    /// Runs `f` inside one transaction. Any error rolls every write back.
    pub fn transaction<T>(&self, f: impl FnOnce(&Transaction) -> AppResult<T>) -> AppResult<T> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_rolls_back_on_error() {
        let db = Db::in_memory().unwrap();
        let result: AppResult<()> = db.transaction(|tx| {
            tx.execute("INSERT INTO categories (name, color, created_at) VALUES ('Math', '#fff', '2026-01-01 00:00:00')", [])?;
            Err(AppError::Internal("boom".to_string()))
        });
        assert!(result.is_err());

        let count: i64 = db
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let db = Db::in_memory().unwrap();
        let enabled: i64 = db
            .with_conn(|conn| Ok(conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
