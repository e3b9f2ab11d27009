use crate::db::categories::Categories;
use crate::db::db::Db;
use crate::db::projects::Projects;
use crate::db::repository::Repository;
use crate::db::sessions::ProjectSessions;
use crate::libs::clock;
use crate::libs::error::{AppError, AppResult};
use crate::libs::kinds::ProjectStatus;
use crate::libs::project::{Project, ProjectInput};
use crate::libs::session::{ProjectSession, SessionInput, SessionTotals, Timed};
use crate::libs::validation;
use chrono::{Duration, NaiveDateTime};
use tracing::info;

#[derive(Clone)]
pub struct ProjectService {
    db: Db,
}

impl ProjectService {
    pub fn new(db: Db) -> Self {
        ProjectService { db }
    }

    pub fn create(&self, input: ProjectInput) -> AppResult<Project> {
        let project = build_project(input, None)?;
        let project = self.db.transaction(|tx| {
            if let Some(category_id) = project.category_id {
                if !Categories::new(tx).exists(category_id)? {
                    return Err(invalid_category(category_id));
                }
            }
            Projects::new(tx).save(project)
        })?;
        info!(project_id = ?project.id, name = %project.name, "project created");
        Ok(project)
    }

    pub fn update(&self, id: i64, input: ProjectInput) -> AppResult<Project> {
        build_project(input.clone(), None)?;
        self.db.transaction(|tx| {
            let projects = Projects::new(tx);
            let existing = projects.find_by_id(id)?;
            let project = build_project(input, Some(existing))?;
            if let Some(category_id) = project.category_id {
                if !Categories::new(tx).exists(category_id)? {
                    return Err(invalid_category(category_id));
                }
            }
            projects.save(project)
        })
    }

    pub fn set_status(&self, id: i64, status: &str) -> AppResult<Project> {
        let status = parse_status(status)?;
        self.db.transaction(|tx| {
            let projects = Projects::new(tx);
            let mut project = projects.find_by_id(id)?;
            project.status = status;
            projects.save(project)
        })
    }

    pub fn get(&self, id: i64) -> AppResult<Project> {
        self.db.with_conn(|conn| Projects::new(conn).find_by_id(id))
    }

    pub fn list(&self, status: Option<ProjectStatus>) -> AppResult<Vec<Project>> {
        self.db.with_conn(|conn| {
            let projects = Projects::new(conn);
            match status {
                Some(status) => projects.by_status(status),
                None => projects.find_all(),
            }
        })
    }

    /// Deletes the project together with its sessions.
    pub fn delete(&self, id: i64) -> AppResult<()> {
        let removed_sessions = self.db.transaction(|tx| {
            let sessions = ProjectSessions::new(tx).for_parent(id)?.len();
            Projects::new(tx).delete(id)?;
            Ok(sessions)
        })?;
        info!(project_id = id, removed_sessions, "project deleted");
        Ok(())
    }

    /// Opens a live session. A project has at most one live session.
    pub fn start_session(&self, project_id: i64, input: SessionInput) -> AppResult<ProjectSession> {
        let start_time = match input.start_time.as_deref() {
            Some(value) => validation::datetime(value, "startTime")?,
            None => clock::now(),
        };
        let focus_level = validation::scale(input.focus_level, "focusLevel", "INVALID_FOCUS_LEVEL")?;

        let session = self.db.transaction(|tx| {
            Projects::new(tx).find_by_id(project_id)?;
            let sessions = ProjectSessions::new(tx);
            if sessions.for_parent(project_id)?.iter().any(|s| s.is_live()) {
                return Err(AppError::validation(
                    "projectId",
                    "SESSION_ALREADY_LIVE",
                    format!("Project {} already has a running session", project_id),
                ));
            }
            sessions.save(ProjectSession {
                id: None,
                project_id,
                start_time,
                end_time: None,
                focus_level,
                notes: input.notes.clone().filter(|n| !n.trim().is_empty()),
            })
        })?;
        info!(project_id, session_id = ?session.id, "project session started");
        Ok(session)
    }

    /// Records a finished session. It does not count against the single live
    /// session a project may have.
    pub fn log_session(&self, project_id: i64, input: SessionInput) -> AppResult<ProjectSession> {
        let (start_time, end_time) = match (input.start_time.as_deref(), input.end_time.as_deref()) {
            (Some(start), Some(end)) => (validation::datetime(start, "startTime")?, validation::datetime(end, "endTime")?),
            (None, _) => return Err(AppError::validation("startTime", "INVALID_DATE", "Field 'startTime' is required")),
            (_, None) => return Err(AppError::validation("endTime", "INVALID_DATE", "Field 'endTime' is required")),
        };
        validation::time_range(start_time, end_time)?;
        let focus_level = validation::scale(input.focus_level, "focusLevel", "INVALID_FOCUS_LEVEL")?;

        let session = self.db.transaction(|tx| {
            Projects::new(tx).find_by_id(project_id)?;
            ProjectSessions::new(tx).save(ProjectSession {
                id: None,
                project_id,
                start_time,
                end_time: Some(end_time),
                focus_level,
                notes: input.notes.clone().filter(|n| !n.trim().is_empty()),
            })
        })?;
        info!(project_id, session_id = ?session.id, "project session logged");
        Ok(session)
    }

    /// Closes a live session at `end_time` (now when absent).
    pub fn stop_session(&self, session_id: i64, end_time: Option<NaiveDateTime>) -> AppResult<ProjectSession> {
        let end_time = end_time.unwrap_or_else(clock::now);
        let session = self.db.transaction(|tx| {
            let sessions = ProjectSessions::new(tx);
            let session = sessions.find_by_id(session_id)?;
            if !session.is_live() {
                return Err(AppError::validation(
                    "sessionId",
                    "SESSION_ALREADY_CLOSED",
                    format!("Project session {} is already closed", session_id),
                ));
            }
            validation::time_range(session.start_time, end_time)?;
            sessions.close(session_id, end_time)
        })?;
        info!(session_id, "project session stopped");
        Ok(session)
    }

    pub fn sessions(&self, project_id: i64) -> AppResult<Vec<ProjectSession>> {
        self.db.with_conn(|conn| {
            Projects::new(conn).find_by_id(project_id)?;
            ProjectSessions::new(conn).for_parent(project_id)
        })
    }

    /// Time spent on the project; live sessions count up to `now`.
    pub fn total_time(&self, project_id: i64, now: NaiveDateTime) -> AppResult<Duration> {
        Ok(self.sessions(project_id)?.total_at(now))
    }
}

pub fn parse_status(value: &str) -> AppResult<ProjectStatus> {
    value.parse().map_err(|_| {
        AppError::validation(
            "status",
            "INVALID_STATUS",
            format!("Status '{}' is not one of {}", value, ProjectStatus::choices()),
        )
    })
}

fn invalid_category(category_id: i64) -> AppError {
    AppError::validation(
        "categoryId",
        "INVALID_CATEGORY_REFERENCE",
        format!("Category {} does not exist", category_id),
    )
}

fn build_project(input: ProjectInput, existing: Option<Project>) -> AppResult<Project> {
    let name = validation::required(&input.name, "name", "PROJECT_NAME_REQUIRED")?;
    validation::max_len(&name, validation::MAX_TITLE_LEN, "name", "PROJECT_NAME_TOO_LONG")?;
    let status = match input.status.as_deref() {
        Some(value) => parse_status(value)?,
        None => existing.as_ref().map(|p| p.status).unwrap_or_default(),
    };

    let mut project = existing.unwrap_or_else(|| Project::new(&name));
    project.name = name;
    project.description = input.description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty());
    project.status = status;
    project.category_id = input.category_id;
    Ok(project)
}
