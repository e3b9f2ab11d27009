use crate::{
    db::{
        db::Db,
        migrations::{get_db_version, needs_migration, MigrationManager},
    },
    libs::{config::Config, messages::Message, view::View},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct MigrationsArgs {
    #[command(subcommand)]
    command: MigrationsCommand,
}

#[derive(Debug, Subcommand)]
enum MigrationsCommand {
    /// Show the schema version
    Status,
    /// List applied migrations
    History,
    /// Apply pending migrations
    Run,
}

pub fn cmd(args: MigrationsArgs) -> Result<()> {
    let path = Config::read()?.db_path()?;
    let mut conn = Db::new_without_migrations(&path)?;
    let manager = MigrationManager::new();

    match args.command {
        MigrationsCommand::Status => {
            let version = get_db_version(&conn)?;
            msg_print!(Message::DbVersion(version, manager.latest_version()));
            if needs_migration(&conn)? {
                msg_info!(Message::MigrationsFound((manager.latest_version() - version) as usize));
            } else {
                msg_info!(Message::DatabaseUpToDate);
            }
        }
        MigrationsCommand::History => {
            let history = manager.get_migration_history(&conn)?;
            if history.is_empty() {
                msg_info!(Message::NoMigrationHistory);
                return Ok(());
            }
            msg_print!(Message::MigrationHistoryHeader, true);
            View::migration_history(&history);
        }
        MigrationsCommand::Run => {
            manager.run_migrations(&mut conn)?;
            msg_success!(Message::AllMigrationsCompleted);
        }
    }

    Ok(())
}
