//! Domain records and shared infrastructure.
//!
//! ## Contents
//!
//! - **Records**: [`task`], [`category`], [`project`], [`session`], [`goal`],
//!   [`reflection`], [`progress`] and the textual enums in [`kinds`]
//! - **Errors and input checks**: [`error`], [`validation`]
//! - **Infrastructure**: [`config`], [`data_storage`], [`clock`],
//!   [`metadata`], [`messages`]
//! - **Output**: [`view`] tables and [`export`] files
//!
//! ```rust
//! use studydesk::libs::task::Task;
//! use studydesk::libs::kinds::{Priority, TaskStatus};
//!
//! let task = Task::new("Read Ch.1");
//! assert_eq!(task.priority, Priority::Medium);
//! assert_eq!(task.status, TaskStatus::Pending);
//! ```

pub mod category;
pub mod clock;
pub mod config;
pub mod data_storage;
pub mod error;
pub mod export;
pub mod goal;
pub mod kinds;
pub mod messages;
pub mod metadata;
pub mod progress;
pub mod project;
pub mod reflection;
pub mod session;
pub mod task;
pub mod validation;
pub mod view;
