//! # Studydesk - local study planner
//!
//! Tasks, categories, projects, study sessions, goals and daily reflections
//! kept in a local SQLite database.
//!
//! ## Layers
//!
//! - [`libs`]: domain records, validation, the error taxonomy and the
//!   configuration and output helpers shared by the front ends
//! - [`db`]: the storage handle, migrations and one repository per entity
//! - [`services`]: validation and multi-repository use cases, each write in
//!   one transaction
//! - [`commands`] and [`api`]: the command line and JSON REST front ends
//!
//! ## Usage
//!
//! ```rust,no_run
//! use studydesk::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
pub mod services;
