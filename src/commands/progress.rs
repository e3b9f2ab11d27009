use super::{parse_date, services};
use crate::{
    libs::{clock, messages::Message, view::View},
    msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ProgressArgs {
    /// Day to summarize: today, yesterday or YYYY-MM-DD
    #[arg(short, long, default_value = "today")]
    date: String,
}

pub fn cmd(args: ProgressArgs) -> Result<()> {
    let date = parse_date(&args.date)?;
    let progress = services()?.progress.daily(date, clock::now())?;

    msg_print!(Message::ProgressHeader(date.format("%B %-d, %Y").to_string()), true);
    View::progress(&progress);
    Ok(())
}
