//! Application configuration.
//!
//! Settings live as pretty-printed JSON in the platform data directory and
//! can be overridden from the environment (a `.env` file is loaded first by
//! `main`):
//!
//! | Variable              | Setting             |
//! |-----------------------|---------------------|
//! | `STUDYDESK_DB_PATH`   | `database.path`     |
//! | `STUDYDESK_HOST`      | `server.host`       |
//! | `STUDYDESK_PORT`      | `server.port`       |
//! | `STUDYDESK_API_TOKEN` | `server.api_token`  |
//!
//! ```rust,no_run
//! use studydesk::libs::config::Config;
//!
//! let config = Config::read()?;
//! println!("serving on {}", config.server.address());
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::db::db::Db;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "config.json";

pub const DB_PATH_ENV: &str = "STUDYDESK_DB_PATH";
pub const HOST_ENV: &str = "STUDYDESK_HOST";
pub const PORT_ENV: &str = "STUDYDESK_PORT";
pub const API_TOKEN_ENV: &str = "STUDYDESK_API_TOKEN";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file. The data directory default is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// When set, every REST request must carry `Authorization: Bearer <token>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            api_token: None,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Loads the saved file (defaults when there is none) and applies
    /// environment overrides.
    pub fn read() -> Result<Config> {
        let mut config = Self::read_file()?;
        config.apply_env()?;
        Ok(config)
    }

    fn read_file() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(&config_file_path)?;
        let config: Config =
            serde_json::from_str(&config_str).with_context(|| format!("Cannot parse {}", config_file_path.display()))?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = env::var(DB_PATH_ENV) {
            self.database.path = Some(path);
        }
        if let Ok(host) = env::var(HOST_ENV) {
            self.server.host = host;
        }
        if let Ok(port) = env::var(PORT_ENV) {
            self.server.port = port.parse().with_context(|| format!("{} must be a port number, got '{}'", PORT_ENV, port))?;
        }
        if let Ok(token) = env::var(API_TOKEN_ENV) {
            self.server.api_token = Some(token).filter(|t| !t.is_empty());
        }
        Ok(())
    }

    /// Writes the file and returns where it went.
    pub fn save(&self) -> Result<PathBuf> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(&config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(config_file_path)
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.database.path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(Db::default_path()?),
        }
    }

    /// Opens the configured database, applying pending migrations.
    pub fn open_db(&self) -> Result<Db> {
        let path = self.db_path()?;
        Ok(Db::open(&path)?)
    }

    /// Interactive setup, starting from the saved values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read_file().unwrap_or_default();

        let modules = [Message::ConfigModuleDatabase.to_string(), Message::ConfigModuleServer.to_string()];
        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules)
            .defaults(&[true, true])
            .interact()?;

        for selection in selected {
            match selection {
                0 => {
                    msg_print!(Message::ConfigModuleDatabase, true);
                    let default = match &config.database.path {
                        Some(path) => path.clone(),
                        None => Db::default_path()?.display().to_string(),
                    };
                    let path: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptDatabasePath.to_string())
                        .default(default)
                        .interact_text()?;
                    config.database.path = Some(path);
                }
                1 => {
                    msg_print!(Message::ConfigModuleServer, true);
                    let default = config.server.clone();
                    let token: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptServerApiToken.to_string())
                        .default(default.api_token.unwrap_or_default())
                        .allow_empty(true)
                        .interact_text()?;
                    config.server = ServerConfig {
                        host: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptServerHost.to_string())
                            .default(default.host)
                            .interact_text()?,
                        port: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptServerPort.to_string())
                            .default(default.port)
                            .interact_text()?,
                        api_token: Some(token).filter(|t| !t.trim().is_empty()),
                    };
                }
                _ => {}
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"server": {"port": 9000}}"#).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database.path, None);
        assert_eq!(config.server.address(), "127.0.0.1:9000");
    }
}
