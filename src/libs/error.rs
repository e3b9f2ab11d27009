//! Typed error taxonomy shared by repositories, services and front ends.
//!
//! Every failure carries a stable machine-readable code next to its human
//! message. Front ends never inspect message text: the CLI prints the
//! message, the REST layer maps the kind to a status and serializes the code.
//!
//! | Kind         | Code examples                                  | HTTP |
//! |--------------|------------------------------------------------|------|
//! | `Validation` | `TASK_TITLE_REQUIRED`, `INVALID_DATE_RANGE`    | 400  |
//! | `NotFound`   | `TASK_NOT_FOUND`, `CATEGORY_NOT_FOUND`         | 404  |
//! | `Database`   | `DB_CONNECTION_FAILED`, `DB_QUERY_FAILED`      | 500  |
//! | `Security`   | `SECURITY_UNAUTHORIZED`                        | 403  |
//! | `Internal`   | `INTERNAL_ERROR`                               | 500  |

use std::fmt;
use thiserror::Error;

pub const DB_CONNECTION_FAILED: &str = "DB_CONNECTION_FAILED";
pub const DB_QUERY_FAILED: &str = "DB_QUERY_FAILED";
pub const DB_MIGRATION_FAILED: &str = "DB_MIGRATION_FAILED";
pub const SECURITY_UNAUTHORIZED: &str = "SECURITY_UNAUTHORIZED";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const VALIDATION_INVALID_INPUT: &str = "VALIDATION_INVALID_INPUT";

/// Result alias used by the repository and service layers.
pub type AppResult<T> = Result<T, AppError>;

/// The persisted entity kinds, used to build not-found codes and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Task,
    Category,
    Project,
    StudySession,
    ProjectSession,
    StudyGoal,
    DailyReflection,
}

impl EntityKind {
    pub fn not_found_code(&self) -> &'static str {
        match self {
            EntityKind::Task => "TASK_NOT_FOUND",
            EntityKind::Category => "CATEGORY_NOT_FOUND",
            EntityKind::Project => "PROJECT_NOT_FOUND",
            EntityKind::StudySession => "STUDY_SESSION_NOT_FOUND",
            EntityKind::ProjectSession => "PROJECT_SESSION_NOT_FOUND",
            EntityKind::StudyGoal => "STUDY_GOAL_NOT_FOUND",
            EntityKind::DailyReflection => "DAILY_REFLECTION_NOT_FOUND",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Task => "Task",
            EntityKind::Category => "Category",
            EntityKind::Project => "Project",
            EntityKind::StudySession => "Study session",
            EntityKind::ProjectSession => "Project session",
            EntityKind::StudyGoal => "Study goal",
            EntityKind::DailyReflection => "Daily reflection",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What could not be found: a numeric id or some other natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Id(i64),
    Key(String),
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Id(id) => write!(f, "id {}", id),
            Lookup::Key(key) => write!(f, "'{}'", key),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Storage failure. Wraps the driver error when there is one.
    #[error("{message}")]
    Database {
        code: &'static str,
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    /// Bad input, detected before storage is touched.
    #[error("{message}")]
    Validation {
        code: &'static str,
        field: &'static str,
        message: String,
    },

    #[error("{kind} not found: {lookup}")]
    NotFound { kind: EntityKind, lookup: Lookup },

    #[error("{message}")]
    Security { code: &'static str, message: String },

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            code,
            field,
            message: message.into(),
        }
    }

    pub fn not_found(kind: EntityKind, id: i64) -> Self {
        AppError::NotFound { kind, lookup: Lookup::Id(id) }
    }

    pub fn not_found_by(kind: EntityKind, key: impl Into<String>) -> Self {
        AppError::NotFound {
            kind,
            lookup: Lookup::Key(key.into()),
        }
    }

    pub fn connection(source: rusqlite::Error) -> Self {
        AppError::Database {
            code: DB_CONNECTION_FAILED,
            message: format!("Failed to connect to database: {}", source),
            source: Some(source),
        }
    }

    pub fn migration(version: u32, source: rusqlite::Error) -> Self {
        AppError::Database {
            code: DB_MIGRATION_FAILED,
            message: format!("Database migration {} failed: {}", version, source),
            source: Some(source),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Security {
            code: SECURITY_UNAUTHORIZED,
            message: message.into(),
        }
    }

    /// Stable machine-readable code of this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database { code, .. } => code,
            AppError::Validation { code, .. } => code,
            AppError::NotFound { kind, .. } => kind.not_found_code(),
            AppError::Security { code, .. } => code,
            AppError::Internal(_) => INTERNAL_ERROR,
        }
    }

    /// Human-readable message.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status equivalent of the error kind.
    pub fn status(&self) -> u16 {
        match self {
            AppError::Validation { .. } => 400,
            AppError::Security { .. } => 403,
            AppError::NotFound { .. } => 404,
            AppError::Database { .. } | AppError::Internal(_) => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation { .. })
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(source: rusqlite::Error) -> Self {
        AppError::Database {
            code: DB_QUERY_FAILED,
            message: format!("Database query failed: {}", source),
            source: Some(source),
        }
    }
}
