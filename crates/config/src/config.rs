//! Core configuration struct and loading logic.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::persistence::{find_config_file, read_config_file, write_config_file};

/// Bounds for the history retention cap.
const HISTORY_CAP_RANGE: std::ops::RangeInclusive<usize> = 1..=200;

/// Bounds for the request timeout, in seconds.
const TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 1..=300;

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_chat_path() -> String {
    "/chat".to_string()
}

fn default_history_cap() -> usize {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// The main configuration struct for the nebula client.
///
/// # Examples
///
/// ```
/// use nebula_config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.base_url, "http://localhost:8000");
/// assert_eq!(config.history_cap, 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Origin of the chat backend, e.g. `http://localhost:8000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the chat endpoint on the backend.
    ///
    /// Defaults to `/chat`; some deployments expose `/api/chat` instead.
    #[serde(default = "default_chat_path")]
    pub chat_path: String,

    /// Number of chat turns retained in local history.
    ///
    /// Oldest turns are evicted first once the cap is exceeded.
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,

    /// Per-request timeout for backend calls, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_path: default_chat_path(),
            history_cap: default_history_cap(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Loads configuration from the default file locations.
    ///
    /// Searches `./nebula.json5`, `./nebula.json`, then the user config
    /// directory. Returns the default configuration when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is found but cannot be
    /// read, parsed, or validated.
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use nebula_config::Config;
    ///
    /// # fn example() -> nebula_config::Result<()> {
    /// let config = Config::load_from("custom-config.json5")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let config: Config = read_config_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        write_config_file(path, self)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is out of its acceptable range.
    ///
    /// # Examples
    ///
    /// ```
    /// use nebula_config::Config;
    ///
    /// let mut config = Config::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.history_cap = 0;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }

        if !self.chat_path.starts_with('/') {
            return Err(ConfigError::InvalidChatPath(self.chat_path.clone()));
        }

        if !HISTORY_CAP_RANGE.contains(&self.history_cap) {
            return Err(ConfigError::InvalidHistoryCap {
                reason: format!(
                    "{} is outside {}..={}",
                    self.history_cap,
                    HISTORY_CAP_RANGE.start(),
                    HISTORY_CAP_RANGE.end()
                ),
            });
        }

        if !TIMEOUT_RANGE.contains(&self.request_timeout_secs) {
            return Err(ConfigError::InvalidTimeout {
                reason: format!(
                    "{}s is outside {}..={}s",
                    self.request_timeout_secs,
                    TIMEOUT_RANGE.start(),
                    TIMEOUT_RANGE.end()
                ),
            });
        }

        Ok(())
    }

    /// Returns the full URL of the chat endpoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use nebula_config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.chat_url(), "http://localhost:8000/chat");
    /// ```
    #[must_use]
    pub fn chat_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.chat_path)
    }
}
