use super::{confirm, date_text, parse_date, services};
use crate::{
    libs::{clock, messages::Message, reflection::ReflectionInput, view::View},
    msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Input};

#[derive(Debug, Args)]
pub struct ReflectArgs {
    #[command(subcommand)]
    command: ReflectCommand,
}

#[derive(Debug, Subcommand)]
enum ReflectCommand {
    /// Write the reflection of a day, replacing any existing one
    Write {
        /// Asked for interactively when omitted
        note: Option<String>,
        /// Day of the reflection, today when omitted
        #[arg(short, long)]
        date: Option<String>,
        /// 1 to 5
        #[arg(short, long)]
        mood: Option<i32>,
    },
    /// Show the reflection of a day
    Show {
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List all reflections
    List,
    /// Delete a reflection
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: ReflectArgs) -> Result<()> {
    let services = services()?;
    let reflections = &services.reflections;

    match args.command {
        ReflectCommand::Write { note, date, mood } => {
            let note = match note {
                Some(note) => note,
                None => Input::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::PromptReflectionNote.to_string())
                    .interact_text()?,
            };
            let reflection = reflections.write(ReflectionInput {
                date: date_text(date)?,
                note,
                mood,
            })?;
            msg_success!(Message::ReflectionSaved(reflection.date.to_string()));
        }
        ReflectCommand::Show { date } => {
            let date = match date {
                Some(date) => parse_date(&date)?,
                None => clock::today(),
            };
            let reflection = reflections.get_by_date(date)?;
            View::reflections(&[reflection]);
        }
        ReflectCommand::List => {
            let list = reflections.list()?;
            if list.is_empty() {
                msg_info!(Message::NoReflectionsFound);
                return Ok(());
            }
            msg_print!(Message::ReflectionsHeader, true);
            View::reflections(&list);
        }
        ReflectCommand::Delete { id, yes } => {
            let reflection = reflections.get(id)?;
            if !confirm(Message::ConfirmDeleteReflection(reflection.date.to_string()), yes)? {
                msg_warning!(Message::OperationCancelled);
                return Ok(());
            }
            reflections.delete(id)?;
            msg_success!(Message::ReflectionDeleted(id));
        }
    }

    Ok(())
}
