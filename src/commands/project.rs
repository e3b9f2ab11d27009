use super::{confirm, parse_time, services};
use crate::{
    libs::{
        clock,
        messages::Message,
        project::ProjectInput,
        session::{format_duration, SessionInput, Timed},
        view::View,
    },
    msg_info, msg_print, msg_success, msg_warning,
    services::project::parse_status,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    command: ProjectCommand,
}

#[derive(Debug, Args)]
struct ProjectFields {
    #[arg(short, long)]
    description: Option<String>,
    /// ACTIVE, PAUSED, COMPLETED or ARCHIVED
    #[arg(short, long)]
    status: Option<String>,
    /// Category id
    #[arg(short, long)]
    category: Option<i64>,
}

#[derive(Debug, Subcommand)]
enum ProjectCommand {
    /// Create a project
    Add {
        name: String,
        #[command(flatten)]
        fields: ProjectFields,
    },
    /// List projects
    List {
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Show a project with its sessions and total time
    Show { id: i64 },
    /// Replace a project's fields
    Edit {
        id: i64,
        #[arg(short, long)]
        name: String,
        #[command(flatten)]
        fields: ProjectFields,
    },
    /// Change a project's status
    Status { id: i64, status: String },
    /// Start a session on a project
    Start {
        id: i64,
        /// Start time, now when omitted
        #[arg(long)]
        at: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Stop a running project session
    Stop {
        session_id: i64,
        /// End time, now when omitted
        #[arg(long)]
        at: Option<String>,
    },
    /// Delete a project and its sessions
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

fn input(name: String, fields: ProjectFields) -> ProjectInput {
    ProjectInput {
        name,
        description: fields.description,
        status: fields.status,
        category_id: fields.category,
    }
}

pub fn cmd(args: ProjectArgs) -> Result<()> {
    let services = services()?;
    let projects = &services.projects;

    match args.command {
        ProjectCommand::Add { name, fields } => {
            let project = projects.create(input(name, fields))?;
            msg_success!(Message::ProjectCreated(project.id.unwrap_or_default(), project.name));
        }
        ProjectCommand::List { status } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            let list = projects.list(status)?;
            if list.is_empty() {
                msg_info!(Message::NoProjectsFound);
                return Ok(());
            }
            msg_print!(Message::ProjectsHeader, true);
            View::projects(&list);
        }
        ProjectCommand::Show { id } => {
            let now = clock::now();
            let project = projects.get(id)?;
            View::projects(std::slice::from_ref(&project));

            let sessions = projects.sessions(id)?;
            if sessions.is_empty() {
                msg_info!(Message::NoSessionsFound);
                return Ok(());
            }
            msg_print!(Message::ProjectSessionsHeader(project.name), true);
            View::project_sessions(&sessions, now);
            msg_print!(Message::ProjectTotalTime(format_duration(&projects.total_time(id, now)?)));
        }
        ProjectCommand::Edit { id, name, fields } => {
            projects.update(id, input(name, fields))?;
            msg_success!(Message::ProjectUpdated(id));
        }
        ProjectCommand::Status { id, status } => {
            let project = projects.set_status(id, &status)?;
            msg_success!(Message::ProjectStatusChanged(id, project.status.to_string()));
        }
        ProjectCommand::Start { id, at, notes } => {
            let session = projects.start_session(
                id,
                SessionInput {
                    start_time: at,
                    notes,
                    ..Default::default()
                },
            )?;
            let project = projects.get(id)?;
            msg_success!(Message::ProjectSessionStarted(project.name, session.id.unwrap_or_default()));
        }
        ProjectCommand::Stop { session_id, at } => {
            let end_time = at.map(|value| parse_time(&value, "endTime")).transpose()?;
            let session = projects.stop_session(session_id, end_time)?;
            msg_success!(Message::ProjectSessionStopped(
                session_id,
                format_duration(&session.duration_at(clock::now()))
            ));
        }
        ProjectCommand::Delete { id, yes } => {
            let project = projects.get(id)?;
            if !confirm(Message::ConfirmDeleteProject(project.name), yes)? {
                msg_warning!(Message::OperationCancelled);
                return Ok(());
            }
            projects.delete(id)?;
            msg_success!(Message::ProjectDeleted(id));
        }
    }

    Ok(())
}
