//! Use-case layer.
//!
//! Services validate input before touching storage, compose several stores
//! per operation inside one transaction, and surface every failure as an
//! [`AppError`](crate::libs::error::AppError). Each service is built from an
//! explicit [`Db`] handle.

pub mod category;
pub mod goal;
pub mod progress;
pub mod project;
pub mod reflection;
pub mod session;
pub mod task;

use crate::db::db::Db;

/// Every service over one shared storage handle.
#[derive(Clone)]
pub struct Services {
    pub tasks: task::TaskService,
    pub categories: category::CategoryService,
    pub projects: project::ProjectService,
    pub sessions: session::SessionService,
    pub goals: goal::GoalService,
    pub reflections: reflection::ReflectionService,
    pub progress: progress::ProgressService,
}

impl Services {
    pub fn new(db: Db) -> Self {
        Services {
            tasks: task::TaskService::new(db.clone()),
            categories: category::CategoryService::new(db.clone()),
            projects: project::ProjectService::new(db.clone()),
            sessions: session::SessionService::new(db.clone()),
            goals: goal::GoalService::new(db.clone()),
            reflections: reflection::ReflectionService::new(db.clone()),
            progress: progress::ProgressService::new(db),
        }
    }
}
