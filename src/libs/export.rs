//! Data export for backup and external analysis.
//!
//! Tasks and sessions go to CSV or JSON. Exporting everything as JSON writes
//! one document with every entity; as CSV it writes one file per table next
//! to the requested path (`<name>_tasks.csv`, `<name>_sessions.csv`).
//!
//! ```rust,no_run
//! use studydesk::libs::export::{ExportData, ExportFormat, Exporter};
//! use studydesk::libs::config::Config;
//! use studydesk::services::Services;
//!
//! let services = Services::new(Config::read()?.open_db()?);
//! let written = Exporter::new(ExportFormat::Csv, None).export(&services, ExportData::Tasks)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::clock;
use crate::libs::session::{format_duration, ProjectSession, StudySession, Timed};
use crate::libs::task::{Task, TaskFilter};
use crate::services::Services;
use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum ExportData {
    Tasks,
    /// Study and project sessions.
    Sessions,
    All,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTask {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category_id: String,
    pub priority: String,
    pub status: String,
    pub deadline: String,
    pub created_at: String,
    pub completed_at: String,
}

impl From<Task> for ExportTask {
    fn from(task: Task) -> Self {
        ExportTask {
            id: task.id.unwrap_or(0),
            title: task.title,
            description: task.description.unwrap_or_default(),
            category_id: text(task.category_id),
            priority: task.priority.to_string(),
            status: task.status.to_string(),
            deadline: text(task.deadline),
            created_at: text(task.created_at),
            completed_at: text(task.completed_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSession {
    pub id: i64,
    /// `study` or `project`.
    pub kind: &'static str,
    pub parent_id: String,
    pub start_time: String,
    pub end_time: String,
    pub duration: String,
    pub focus_level: String,
    pub notes: String,
}

impl ExportSession {
    fn study(session: StudySession, now: NaiveDateTime) -> Self {
        ExportSession {
            id: session.id.unwrap_or(0),
            kind: "study",
            parent_id: text(session.task_id),
            start_time: session.start_time.to_string(),
            end_time: text(session.end_time),
            duration: format_duration(&session.duration_at(now)),
            focus_level: text(session.focus_level),
            notes: session.notes.unwrap_or_default(),
        }
    }

    fn project(session: ProjectSession, now: NaiveDateTime) -> Self {
        ExportSession {
            id: session.id.unwrap_or(0),
            kind: "project",
            parent_id: session.project_id.to_string(),
            start_time: session.start_time.to_string(),
            end_time: text(session.end_time),
            duration: format_duration(&session.duration_at(now)),
            focus_level: text(session.focus_level),
            notes: session.notes.unwrap_or_default(),
        }
    }
}

fn text<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>) -> Self {
        let default_name = format!("studydesk_export_{}", clock::now().format("%Y%m%d_%H%M%S"));
        let output_path = output_path.unwrap_or_else(|| PathBuf::from(format!("{}.{}", default_name, format.extension())));

        Self { format, output_path }
    }

    /// Writes the export and returns the files created. Empty tables are
    /// skipped, so nothing is written for an empty database.
    pub fn export(&self, services: &Services, data: ExportData) -> Result<Vec<PathBuf>> {
        let now = clock::now();
        match data {
            ExportData::Tasks => self.write_table(&self.output_path, &export_tasks(services)?),
            ExportData::Sessions => self.write_table(&self.output_path, &export_sessions(services, now)?),
            ExportData::All => self.export_all(services, now),
        }
    }

    fn write_table<T: Serialize>(&self, path: &Path, rows: &[T]) -> Result<Vec<PathBuf>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        self.write(path, rows)?;
        Ok(vec![path.to_path_buf()])
    }

    fn export_all(&self, services: &Services, now: NaiveDateTime) -> Result<Vec<PathBuf>> {
        if self.format == ExportFormat::Json {
            let all_data = serde_json::json!({
                "exportDate": now.format("%Y-%m-%d %H:%M:%S").to_string(),
                "categories": services.categories.list()?,
                "tasks": services.tasks.list(TaskFilter::All)?,
                "projects": services.projects.list(None)?,
                "sessions": export_sessions(services, now)?,
                "goals": services.goals.list()?,
                "reflections": services.reflections.list()?,
            });
            let json = serde_json::to_string_pretty(&all_data)?;
            File::create(&self.output_path)?.write_all(json.as_bytes())?;
            return Ok(vec![self.output_path.clone()]);
        }

        let mut written = self.write_table(&self.sibling("tasks"), &export_tasks(services)?)?;
        written.extend(self.write_table(&self.sibling("sessions"), &export_sessions(services, now)?)?);
        Ok(written)
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let base = self
            .output_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "studydesk_export".to_string());
        self.output_path
            .with_file_name(format!("{}_{}.{}", base, suffix, self.format.extension()))
    }

    fn write<T: Serialize>(&self, path: &Path, rows: &[T]) -> Result<()> {
        match self.format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_path(path)?;
                for row in rows {
                    wtr.serialize(row)?;
                }
                wtr.flush()?;
            }
            ExportFormat::Json => {
                let json = serde_json::to_string_pretty(rows)?;
                File::create(path)?.write_all(json.as_bytes())?;
            }
        }
        Ok(())
    }
}

fn export_tasks(services: &Services) -> Result<Vec<ExportTask>> {
    Ok(services.tasks.list(TaskFilter::All)?.into_iter().map(ExportTask::from).collect())
}

fn export_sessions(services: &Services, now: NaiveDateTime) -> Result<Vec<ExportSession>> {
    let mut rows: Vec<ExportSession> = services
        .sessions
        .list()?
        .into_iter()
        .map(|s| ExportSession::study(s, now))
        .collect();

    for project in services.projects.list(None)? {
        if let Some(project_id) = project.id {
            rows.extend(
                services
                    .projects
                    .sessions(project_id)?
                    .into_iter()
                    .map(|s| ExportSession::project(s, now)),
            );
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::db::Db;
    use crate::libs::session::SessionInput;
    use crate::libs::task::TaskInput;

    fn services() -> Services {
        Services::new(Db::in_memory().unwrap())
    }

    #[test]
    fn empty_tables_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(ExportFormat::Csv, Some(dir.path().join("out.csv")));

        let written = exporter.export(&services(), ExportData::All).unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn csv_all_writes_one_file_per_table() {
        let services = services();
        services
            .tasks
            .create(TaskInput {
                title: "Read Ch.1".to_string(),
                ..Default::default()
            })
            .unwrap();
        services
            .sessions
            .log(SessionInput {
                start_time: Some("2026-03-01 09:00:00".to_string()),
                end_time: Some("2026-03-01 09:45:00".to_string()),
                ..Default::default()
            })
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(ExportFormat::Csv, Some(dir.path().join("backup.csv")));
        let written = exporter.export(&services, ExportData::All).unwrap();

        assert_eq!(written, vec![dir.path().join("backup_tasks.csv"), dir.path().join("backup_sessions.csv")]);
        let tasks = std::fs::read_to_string(&written[0]).unwrap();
        assert!(tasks.starts_with("id,title,description,categoryId"));
        assert!(tasks.contains("Read Ch.1"));
        let sessions = std::fs::read_to_string(&written[1]).unwrap();
        assert!(sessions.contains("study"));
    }

    #[test]
    fn json_all_is_one_document() {
        let services = services();
        services
            .tasks
            .create(TaskInput {
                title: "Essay".to_string(),
                ..Default::default()
            })
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all.json");
        let written = Exporter::new(ExportFormat::Json, Some(path.clone()))
            .export(&services, ExportData::All)
            .unwrap();
        assert_eq!(written, vec![path.clone()]);

        let doc: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["tasks"][0]["title"], "Essay");
        assert!(doc["reflections"].as_array().unwrap().is_empty());
    }
}
