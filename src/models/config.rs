//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Search endpoint and HTTP behavior
    #[serde(default)]
    pub search: SearchConfig,

    /// State file locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Queue ordering rules
    #[serde(default)]
    pub queue: QueueConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Config load failed from {:?}: {}. Using defaults.", path, e);
            Self::default()
        })
    }

    /// Load a configuration file the user asked for by name.
    ///
    /// Unlike [`Config::load_or_default`], a missing file is an error.
    pub fn load_explicit(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AppError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        Self::load(path)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.search.endpoint.trim().is_empty() {
            return Err(AppError::validation("search.endpoint is empty"));
        }
        Url::parse(&self.search.endpoint)?;
        if self.search.query.trim().is_empty() {
            return Err(AppError::validation("search.query is empty"));
        }
        if self.search.user_agent.trim().is_empty() {
            return Err(AppError::validation("search.user_agent is empty"));
        }
        if self.search.timeout_secs == 0 {
            return Err(AppError::validation("search.timeout_secs must be > 0"));
        }
        if self.storage.watermark_file.trim().is_empty()
            || self.storage.backlog_file.trim().is_empty()
        {
            return Err(AppError::validation("storage file names must not be empty"));
        }
        if self.storage.watermark_file == self.storage.backlog_file {
            return Err(AppError::validation(
                "storage.watermark_file and storage.backlog_file must differ",
            ));
        }
        Ok(())
    }
}

/// Search endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Search URL; the query is appended as `?q=`
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// Fixed search term
    #[serde(default = "defaults::query")]
    pub query: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Abort the run instead of degrading to an empty fetch
    #[serde(default)]
    pub fail_on_error: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::endpoint(),
            query: defaults::query(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            fail_on_error: false,
        }
    }
}

/// State file names, relative to the state directory.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "defaults::watermark_file")]
    pub watermark_file: String,

    #[serde(default = "defaults::backlog_file")]
    pub backlog_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            watermark_file: defaults::watermark_file(),
            backlog_file: defaults::backlog_file(),
        }
    }
}

/// Queue behavior settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueueConfig {
    #[serde(default)]
    pub mode: QueueMode,
}

/// How candidates are ordered and trimmed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueMode {
    /// Lexicographic order on the serialized line; lists of two or fewer
    /// keep the emitted record.
    #[default]
    Compat,

    /// Newest id first; the emitted record is always removed.
    Fixed,
}

mod defaults {
    pub fn endpoint() -> String {
        "http://search.twitter.com/search.json".into()
    }
    pub fn query() -> String {
        "hackpgh".into()
    }
    pub fn user_agent() -> String {
        concat!("postqueue/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        30
    }

    pub fn watermark_file() -> String {
        "last.txt".into()
    }
    pub fn backlog_file() -> String {
        "tweets.txt".into()
    }
}
