use super::{confirm, services};
use crate::{
    libs::{
        category::CategoryInput,
        messages::Message,
        task::TaskFilter,
        view::View,
    },
    msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct CategoryArgs {
    #[command(subcommand)]
    command: CategoryCommand,
}

#[derive(Debug, Subcommand)]
enum CategoryCommand {
    /// Create a category
    Add {
        name: String,
        /// #rrggbb, defaults to #3498db
        #[arg(short, long)]
        color: Option<String>,
    },
    /// List categories
    List,
    /// Rename or recolor a category
    Edit {
        id: i64,
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        color: Option<String>,
    },
    /// List the tasks of a category
    Tasks { id: i64 },
    /// Delete a category; its tasks and projects keep existing
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: CategoryArgs) -> Result<()> {
    let services = services()?;
    let categories = &services.categories;

    match args.command {
        CategoryCommand::Add { name, color } => {
            let category = categories.create(CategoryInput { name, color })?;
            msg_success!(Message::CategoryCreated(category.name));
        }
        CategoryCommand::List => {
            let list = categories.list()?;
            if list.is_empty() {
                msg_info!(Message::NoCategoriesFound);
                return Ok(());
            }
            msg_print!(Message::CategoriesHeader, true);
            View::categories(&list);
        }
        CategoryCommand::Edit { id, name, color } => {
            let color = match color {
                Some(color) => Some(color),
                None => Some(categories.get(id)?.color),
            };
            let category = categories.update(id, CategoryInput { name, color })?;
            msg_success!(Message::CategoryUpdated(category.name));
        }
        CategoryCommand::Tasks { id } => {
            let category = categories.get(id)?;
            let tasks = services.tasks.list(TaskFilter::Category(id))?;
            if tasks.is_empty() {
                msg_info!(Message::NoTasksFound);
                return Ok(());
            }
            msg_print!(category.name, true);
            View::tasks(&tasks);
        }
        CategoryCommand::Delete { id, yes } => {
            let category = categories.get(id)?;
            let used_by = services.tasks.list(TaskFilter::Category(id))?.len();
            if !confirm(Message::ConfirmDeleteCategory(category.name.clone(), used_by), yes)? {
                msg_warning!(Message::OperationCancelled);
                return Ok(());
            }
            let detached = categories.delete(id)?;
            msg_success!(Message::CategoryDeleted(category.name, detached));
        }
    }

    Ok(())
}
