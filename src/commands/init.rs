use crate::{
    libs::{config::Config, messages::Message},
    msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Keep the current settings and only create or migrate the database
    #[arg(long)]
    skip_prompts: bool,
}

pub fn cmd(args: InitArgs) -> Result<()> {
    let config = if args.skip_prompts { Config::read()? } else { Config::init()? };

    let path = config.save()?;
    msg_success!(Message::ConfigSaved(path.display().to_string()));

    config.open_db()?;
    msg_success!(Message::DatabaseReady(config.db_path()?.display().to_string()));
    Ok(())
}
