use super::{confirm, date_text, parse_date, services};
use crate::{
    libs::{goal::GoalInput, goal::StudyGoal, messages::Message, view::View},
    msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct GoalArgs {
    #[command(subcommand)]
    command: GoalCommand,
}

#[derive(Debug, Args)]
struct GoalFields {
    /// First day, today when omitted
    #[arg(long)]
    start: Option<String>,
    /// Last day
    #[arg(long)]
    end: Option<String>,
    /// SESSIONS or MINUTES
    #[arg(short, long)]
    metric: Option<String>,
    #[arg(short, long)]
    target: Option<i64>,
}

#[derive(Debug, Subcommand)]
enum GoalCommand {
    /// Create a goal
    Add {
        title: String,
        #[command(flatten)]
        fields: GoalFields,
    },
    /// List goals
    List {
        /// Only goals covering this date
        #[arg(long)]
        active_on: Option<String>,
    },
    /// Replace a goal's definition; progress is kept
    Edit {
        id: i64,
        #[arg(long)]
        title: String,
        #[command(flatten)]
        fields: GoalFields,
    },
    /// Add to a goal's progress
    Progress { id: i64, amount: i64 },
    /// Recompute progress from logged study sessions
    Refresh { id: i64 },
    /// Delete a goal
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

fn input(title: String, fields: GoalFields) -> Result<GoalInput> {
    Ok(GoalInput {
        title,
        start_date: date_text(fields.start)?,
        end_date: date_text(fields.end)?,
        metric: fields.metric,
        target: fields.target,
    })
}

fn report(goal: &StudyGoal) {
    msg_print!(Message::GoalProgress(goal.title.clone(), goal.progress, goal.target, goal.percent()));
    if goal.is_achieved() {
        msg_success!(Message::GoalAchieved(goal.title.clone()));
    }
}

pub fn cmd(args: GoalArgs) -> Result<()> {
    let services = services()?;
    let goals = &services.goals;

    match args.command {
        GoalCommand::Add { title, fields } => {
            let goal = goals.create(input(title, fields)?)?;
            msg_success!(Message::GoalCreated(goal.id.unwrap_or_default(), goal.title));
        }
        GoalCommand::List { active_on } => {
            let list = match active_on {
                Some(date) => goals.active_on(parse_date(&date)?)?,
                None => goals.list()?,
            };
            if list.is_empty() {
                msg_info!(Message::NoGoalsFound);
                return Ok(());
            }
            msg_print!(Message::GoalsHeader, true);
            View::goals(&list);
        }
        GoalCommand::Edit { id, title, fields } => {
            goals.update(id, input(title, fields)?)?;
            msg_success!(Message::GoalUpdated(id));
        }
        GoalCommand::Progress { id, amount } => report(&goals.add_progress(id, amount)?),
        GoalCommand::Refresh { id } => report(&goals.refresh_progress(id)?),
        GoalCommand::Delete { id, yes } => {
            let goal = goals.get(id)?;
            if !confirm(Message::ConfirmDeleteGoal(goal.title), yes)? {
                msg_warning!(Message::OperationCancelled);
                return Ok(());
            }
            goals.delete(id)?;
            msg_success!(Message::GoalDeleted(id));
        }
    }

    Ok(())
}
