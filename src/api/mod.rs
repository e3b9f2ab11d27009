//! JSON REST surface.
//!
//! A small HTTP/1.1 server on tokio: [`http`] parses requests and writes
//! responses, [`router`] matches `{param}` path patterns, [`routes`] maps
//! every endpoint onto a service call and [`error`] renders failures as
//! `{errorCode, message, details, timestamp}`.
//!
//! ```rust,no_run
//! use studydesk::api::server::Server;
//! use studydesk::libs::config::Config;
//! use studydesk::services::Services;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::read()?;
//! let services = Services::new(config.open_db()?);
//! Server::serve(services, &config.server).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;
pub mod router;
pub mod routes;
pub mod server;
