use super::{confirm, date_text, services};
use crate::{
    libs::{
        clock,
        messages::Message,
        session::{format_duration, SessionInput, Timed},
        task::TaskInput,
        view::View,
    },
    msg_info, msg_print, msg_success, msg_warning,
    services::task::filter,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    command: TaskCommand,
}

#[derive(Debug, Args)]
struct TaskFields {
    #[arg(short, long)]
    description: Option<String>,
    /// Category id
    #[arg(short, long)]
    category: Option<i64>,
    /// LOW, MEDIUM or HIGH
    #[arg(short, long)]
    priority: Option<String>,
    /// YYYY-MM-DD, today or tomorrow
    #[arg(long)]
    deadline: Option<String>,
    /// PENDING, IN_PROGRESS or DONE
    #[arg(short, long)]
    status: Option<String>,
}

impl TaskFields {
    fn into_input(self, title: String) -> Result<TaskInput> {
        Ok(TaskInput {
            title,
            description: self.description,
            category_id: self.category,
            priority: self.priority,
            deadline: date_text(self.deadline)?,
            status: self.status,
        })
    }
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    /// Create a task
    Add {
        title: String,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// List tasks, optionally filtered
    List {
        #[arg(short, long)]
        status: Option<String>,
        #[arg(short, long)]
        category: Option<i64>,
        /// Tasks due on this date
        #[arg(long)]
        due: Option<String>,
    },
    /// Show one task
    Show { id: i64 },
    /// Replace a task's fields
    Edit {
        id: i64,
        #[arg(short, long)]
        title: String,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Change a task's status
    Status { id: i64, status: String },
    /// Mark a task done and log the session spent on it
    Done {
        id: i64,
        /// Session start, YYYY-MM-DD HH:MM
        #[arg(long)]
        start: String,
        /// Session end, now when omitted
        #[arg(long)]
        end: Option<String>,
        #[arg(short, long)]
        focus: Option<i32>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Delete a task
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: TaskArgs) -> Result<()> {
    let services = services()?;
    let tasks = &services.tasks;

    match args.command {
        TaskCommand::Add { title, fields } => {
            let task = tasks.create(fields.into_input(title)?)?;
            msg_success!(Message::TaskCreated(task.id.unwrap_or_default(), task.title));
        }
        TaskCommand::List { status, category, due } => {
            let due = date_text(due)?;
            let list = tasks.list(filter(status.as_deref(), category, due.as_deref())?)?;
            if list.is_empty() {
                msg_info!(Message::NoTasksFound);
                return Ok(());
            }
            msg_print!(Message::TasksHeader, true);
            View::tasks(&list);
        }
        TaskCommand::Show { id } => View::task(&tasks.get(id)?),
        TaskCommand::Edit { id, title, fields } => {
            tasks.update(id, fields.into_input(title)?)?;
            msg_success!(Message::TaskUpdated(id));
        }
        TaskCommand::Status { id, status } => {
            let task = tasks.set_status(id, &status)?;
            msg_success!(Message::TaskStatusChanged(id, task.status.to_string()));
        }
        TaskCommand::Done {
            id,
            start,
            end,
            focus,
            notes,
        } => {
            let input = SessionInput {
                parent_id: Some(id),
                start_time: Some(start),
                end_time: end,
                focus_level: focus,
                notes,
            };
            let (_, session) = tasks.complete_with_session(id, input)?;
            msg_success!(Message::TaskCompleted(id, format_duration(&session.duration_at(clock::now()))));
        }
        TaskCommand::Delete { id, yes } => {
            let task = tasks.get(id)?;
            if !confirm(Message::ConfirmDeleteTask(task.title), yes)? {
                msg_warning!(Message::OperationCancelled);
                return Ok(());
            }
            tasks.delete(id)?;
            msg_success!(Message::TaskDeleted(id));
        }
    }

    Ok(())
}
