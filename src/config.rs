use std::{env, fmt::Debug, fs, path::Path};

use anyhow::Context;
use log::debug;
use serde::Deserialize;

/// Port used for the STARTTLS submission session
pub const SUBMISSION_PORT: u16 = 587;

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Sender address, also used as the SMTP login
    #[serde(default)]
    pub email: String,

    /// Password (or app password) for the SMTP login
    #[serde(default)]
    pub password: String,

    /// SMTP relay to connect to eg. smtp.gmail.com
    #[serde(default)]
    pub host: String,

    /// Display name shown next to the sender address
    #[serde(default)]
    pub username: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    SUBMISSION_PORT
}

impl Config {
    /// Reads the settings from the process environment, loading `.env` first if one exists.
    ///
    /// Missing variables become empty strings, they are not validated here and
    /// only show up as a failed send later.
    pub fn from_env() -> Config {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {path:?}"),
            Err(e) => debug!("No .env loaded: {e}"),
        }
        let result = Self::from_lookup(|key| env::var(key).ok());
        debug!("Config from environment: {result:?}");
        result
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Config> {
        debug!("Loading Config from: {config_path:?}");
        let file_contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read contents of {config_path:?}"))?;
        let result = serde_json::from_str(&file_contents)
            .with_context(|| format!("Failed to parse contents of {config_path:?}"))?;
        debug!("Config from file: {result:?}");
        Ok(result)
    }

    fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).unwrap_or_default();
        Self {
            email: var("EMAIL"),
            password: var("PASSWORD"),
            host: var("HOST"),
            username: var("USERNAME"),
            port: SUBMISSION_PORT,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let password = if self.password.is_empty() {
            "<empty>"
        } else {
            "<redacted>"
        };
        f.debug_struct("Config")
            .field("email", &self.email)
            .field("password", &password)
            .field("host", &self.host)
            .field("username", &self.username)
            .field("port", &self.port)
            .finish()
    }
}
