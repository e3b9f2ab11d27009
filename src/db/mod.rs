//! Database layer for the studydesk application.
//!
//! SQLite persistence for every entity. `db::Db` is the storage handle;
//! each entity store borrows a connection (or an open transaction) from it
//! and implements [`repository::Repository`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use studydesk::db::{db::Db, repository::Repository, tasks::Tasks};
//! use studydesk::libs::task::Task;
//!
//! let db = Db::in_memory()?;
//! let task = db.with_conn(|conn| Tasks::new(conn).save(Task::new("Read Ch.1")))?;
//! assert!(task.id.is_some());
//! # Ok::<(), studydesk::libs::error::AppError>(())
//! ```

/// Storage handle: connection ownership, scopes and transactions.
pub mod db;

/// Versioned schema migrations applied at open.
pub mod migrations;

/// The CRUD capability trait shared by all stores.
pub mod repository;

pub mod categories;
pub mod goals;
pub mod projects;
pub mod reflections;

/// Study and project session stores.
pub mod sessions;

pub mod tasks;
