use super::services;
use crate::{
    libs::{
        export::{ExportData, ExportFormat, Exporter},
        messages::Message,
    },
    msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// What to export
    #[arg(value_enum, default_value = "tasks")]
    data: ExportData,

    #[arg(short, long, value_enum, default_value = "csv")]
    format: ExportFormat,

    /// Output file, a timestamped name in the current directory when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn cmd(args: ExportArgs) -> Result<()> {
    let services = services()?;
    let written = Exporter::new(args.format, args.output).export(&services, args.data)?;

    if written.is_empty() {
        msg_warning!(Message::ExportNothing);
    }
    for path in written {
        msg_success!(Message::ExportCompleted(path.display().to_string()));
    }
    Ok(())
}
