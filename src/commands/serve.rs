use crate::{
    api::server::Server,
    libs::{
        config::{Config, ServerConfig},
        messages::Message,
    },
    msg_info, msg_print,
    services::Services,
};
use anyhow::{Context, Result};
use clap::Args;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Overrides the configured host
    #[arg(long)]
    host: Option<String>,
    /// Overrides the configured port
    #[arg(short, long)]
    port: Option<u16>,
}

pub async fn cmd(args: ServeArgs) -> Result<()> {
    let config = Config::read()?;
    let services = Services::new(config.open_db()?);

    let mut server = config.server.clone();
    if let Some(host) = args.host {
        server.host = host;
    }
    if let Some(port) = args.port {
        server.port = port;
    }

    msg_print!(Message::ServerStarting(server.address()));
    if server.api_token.as_deref().is_some_and(|t| !t.is_empty()) {
        msg_info!(Message::ServerTokenEnabled);
    }

    run(services, &server).await?;
    msg_print!(Message::ServerStopped);
    Ok(())
}

/// Serves until Ctrl-C. A failure comes back labelled with the address and is
/// reported once, by `main`.
async fn run(services: Services, server: &ServerConfig) -> Result<()> {
    Server::serve(services, server)
        .await
        .with_context(|| Message::ServerFailed(server.address()).to_string())
}
