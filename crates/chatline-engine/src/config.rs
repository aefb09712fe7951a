//! Configuration for chatline.
//!
//! The only setting is the base URL of the chat service. It is read from the
//! `CHATLINE_API_URL` environment variable, optionally populated from a
//! `.env` file, and can be overridden by the caller.

use reqwest::Url;
use serde::Serialize;
use std::path::Path;

use crate::transport::message_endpoint;

/// Environment variable holding the chat service base URL.
pub const BASE_URL_VAR: &str = "CHATLINE_API_URL";

/// Env file read from the working directory.
const ENV_FILE: &str = ".env";

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Base URL of the chat service, without a trailing slash.
    base_url: String,
}

impl Config {
    /// Build a config from an explicit base URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }

        let url = Url::parse(trimmed)
            .map_err(|e| ConfigError::InvalidUrl(trimmed.to_string(), e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(
                trimmed.to_string(),
                format!("unsupported scheme `{}`", url.scheme()),
            ));
        }

        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    /// Resolve the config from the process environment.
    ///
    /// Falls back to a `.env` file in the working directory when the variable
    /// is not set. Variables already set in the environment take precedence
    /// over the file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_and_file(Path::new(ENV_FILE), |key| std::env::var(key).ok())
    }

    /// Resolve through `lookup`, then through the env file at `path`. A
    /// missing file is not an error.
    fn from_env_and_file<F>(path: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = match lookup(BASE_URL_VAR) {
            Some(value) => value,
            None => read_env_file(path)?.ok_or(ConfigError::MissingBaseUrl)?,
        };
        Self::with_base_url(&value)
    }

    /// Base URL of the chat service.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL messages are posted to.
    pub fn endpoint(&self) -> String {
        message_endpoint(&self.base_url)
    }
}

/// Read the base URL variable from an env file, if the file exists.
fn read_env_file(path: &Path) -> Result<Option<String>, ConfigError> {
    let items = match dotenvy::from_path_iter(path) {
        Ok(items) => items,
        Err(e) if e.not_found() => return Ok(None),
        Err(e) => return Err(ConfigError::EnvFile(e.to_string())),
    };

    let mut base_url = None;
    for item in items {
        let (key, value) = item.map_err(|e| ConfigError::EnvFile(e.to_string()))?;
        if key == BASE_URL_VAR {
            base_url = Some(value);
        }
    }
    Ok(base_url)
}

/// Errors that can occur when resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No base URL was provided.
    #[error("No chat service URL configured (set CHATLINE_API_URL or pass --api-url)")]
    MissingBaseUrl,

    /// The base URL could not be parsed.
    #[error("Invalid chat service URL `{0}`: {1}")]
    InvalidUrl(String, String),

    /// The env file could not be read.
    #[error("Failed to read env file: {0}")]
    EnvFile(String),
}
