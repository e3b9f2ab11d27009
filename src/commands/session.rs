use super::{confirm, parse_date, parse_time, services};
use crate::{
    libs::{
        clock,
        messages::Message,
        session::{format_duration, SessionInput, Timed},
        view::View,
    },
    msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Debug, Subcommand)]
enum SessionCommand {
    /// Record a finished study session
    Log {
        /// Session start, YYYY-MM-DD HH:MM
        #[arg(long)]
        start: String,
        /// Session end, YYYY-MM-DD HH:MM
        #[arg(long)]
        end: String,
        /// Task the session was spent on
        #[arg(short, long)]
        task: Option<i64>,
        /// 1 to 5
        #[arg(short, long)]
        focus: Option<i32>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Start a live study session
    Start {
        #[arg(short, long)]
        task: Option<i64>,
        /// Start time, now when omitted
        #[arg(long)]
        at: Option<String>,
    },
    /// Stop a live study session
    Stop {
        id: i64,
        /// End time, now when omitted
        #[arg(long)]
        at: Option<String>,
    },
    /// List study sessions
    List {
        /// Sessions started on this date
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        task: Option<i64>,
    },
    /// List running sessions
    Live,
    /// Delete a study session
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: SessionArgs) -> Result<()> {
    let services = services()?;
    let sessions = &services.sessions;
    let now = clock::now();

    match args.command {
        SessionCommand::Log {
            start,
            end,
            task,
            focus,
            notes,
        } => {
            let session = sessions.log(SessionInput {
                parent_id: task,
                start_time: Some(start),
                end_time: Some(end),
                focus_level: focus,
                notes,
            })?;
            msg_success!(Message::SessionLogged(
                session.id.unwrap_or_default(),
                format_duration(&session.duration_at(now))
            ));
        }
        SessionCommand::Start { task, at } => {
            let session = sessions.start(SessionInput {
                parent_id: task,
                start_time: at,
                ..Default::default()
            })?;
            msg_success!(Message::SessionStarted(session.id.unwrap_or_default()));
        }
        SessionCommand::Stop { id, at } => {
            let end_time = at.map(|value| parse_time(&value, "endTime")).transpose()?;
            let session = sessions.stop(id, end_time)?;
            msg_success!(Message::SessionStopped(id, format_duration(&session.duration_at(now))));
        }
        SessionCommand::List { date, task } => {
            let list = match (task, date) {
                (Some(task_id), _) => sessions.for_task(task_id)?,
                (None, Some(date)) => sessions.on(parse_date(&date)?)?,
                (None, None) => sessions.list()?,
            };
            if list.is_empty() {
                msg_info!(Message::NoSessionsFound);
                return Ok(());
            }
            msg_print!(Message::SessionsHeader, true);
            View::study_sessions(&list, now);
        }
        SessionCommand::Live => {
            let list = sessions.live()?;
            if list.is_empty() {
                msg_info!(Message::NoSessionsFound);
                return Ok(());
            }
            msg_print!(Message::LiveSessionsHeader, true);
            View::study_sessions(&list, now);
        }
        SessionCommand::Delete { id, yes } => {
            sessions.get(id)?;
            if !confirm(Message::ConfirmDeleteSession(id), yes)? {
                msg_warning!(Message::OperationCancelled);
                return Ok(());
            }
            sessions.delete(id)?;
            msg_success!(Message::SessionDeleted(id));
        }
    }

    Ok(())
}
