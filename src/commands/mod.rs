//! Command line front end.
//!
//! Every subcommand parses its arguments with `clap`, calls one service and
//! renders the result through the `msg_*` macros or a [`View`] table. No
//! business rule lives here.
//!
//! [`View`]: crate::libs::view::View

pub mod category;
pub mod export;
pub mod goal;
pub mod init;
pub mod migrations;
pub mod progress;
pub mod project;
pub mod reflect;
pub mod serve;
pub mod session;
pub mod task;

use crate::libs::clock;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::validation;
use crate::services::Services;
use anyhow::Result;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configure the database and the REST server")]
    Init(init::InitArgs),
    #[command(about = "Manage tasks")]
    Task(task::TaskArgs),
    #[command(about = "Manage categories")]
    Category(category::CategoryArgs),
    #[command(about = "Manage projects and their sessions")]
    Project(project::ProjectArgs),
    #[command(about = "Log, start and stop study sessions")]
    Session(session::SessionArgs),
    #[command(about = "Manage study goals")]
    Goal(goal::GoalArgs),
    #[command(about = "Write or read daily reflections")]
    Reflect(reflect::ReflectArgs),
    #[command(about = "Show the progress of a day")]
    Progress(progress::ProgressArgs),
    #[command(about = "Export data to CSV or JSON")]
    Export(export::ExportArgs),
    #[command(about = "Run the JSON REST server")]
    Serve(serve::ServeArgs),
    #[command(about = "Inspect database migrations")]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Task(args) => task::cmd(args),
            Commands::Category(args) => category::cmd(args),
            Commands::Project(args) => project::cmd(args),
            Commands::Session(args) => session::cmd(args),
            Commands::Goal(args) => goal::cmd(args),
            Commands::Reflect(args) => reflect::cmd(args),
            Commands::Progress(args) => progress::cmd(args),
            Commands::Export(args) => export::cmd(args),
            Commands::Serve(args) => serve::cmd(args).await,
            Commands::Migrations(args) => migrations::cmd(args),
        }
    }
}

/// Services over the configured database.
pub(crate) fn services() -> Result<Services> {
    Ok(Services::new(Config::read()?.open_db()?))
}

/// Accepts `today`, `yesterday`, `tomorrow` or `YYYY-MM-DD`.
pub(crate) fn parse_date(value: &str) -> Result<NaiveDate> {
    let today = clock::today();
    match value.trim().to_lowercase().as_str() {
        "today" => Ok(today),
        "yesterday" => Ok(today - Duration::days(1)),
        "tomorrow" => Ok(today + Duration::days(1)),
        _ => Ok(validation::date(value, "date")?),
    }
}

/// Same shorthands as [`parse_date`], as the text the services expect.
pub(crate) fn date_text(value: Option<String>) -> Result<Option<String>> {
    value.map(|v| Ok(parse_date(&v)?.to_string())).transpose()
}

pub(crate) fn parse_time(value: &str, field: &'static str) -> Result<NaiveDateTime> {
    Ok(validation::datetime(value, field)?)
}

/// Asks before a destructive action unless `yes` is set.
pub(crate) fn confirm(prompt: Message, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt.to_string())
        .default(false)
        .interact()?)
}
