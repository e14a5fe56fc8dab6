//! Configuration handling for the inventory client
//!
//! Configuration is stored in `~/.config/book-inventory/config.toml`.
//! Every setting has a default, so a missing file is not an error.
//!
//! ```toml
//! api_url = "http://localhost:8080/api/books"
//! timeout_secs = 10
//!
//! [draft]
//! quantity = 1
//! genre = ""
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::BookDraft;

/// Collection endpoint used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/books";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Field values a fresh draft starts with
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DraftDefaults {
    /// Copies pre-filled on a new record
    pub quantity: u32,

    /// Genre pre-filled on a new record
    pub genre: String,
}

impl Default for DraftDefaults {
    fn default() -> Self {
        Self {
            quantity: 1,
            genre: String::new(),
        }
    }
}

impl DraftDefaults {
    /// Builds the empty draft the edit session resets to
    pub fn to_draft(&self) -> BookDraft {
        BookDraft {
            quantity: self.quantity.to_string(),
            genre: self.genre.clone(),
            ..BookDraft::default()
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// URL of the book collection resource
    pub api_url: String,

    /// Upper bound on each request, in seconds
    pub timeout_secs: u64,

    /// Draft template
    pub draft: DraftDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 10,
            draft: DraftDefaults::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Failed to load config: {}", path.display()))?;
        Ok(config)
    }

    /// Parses and validates TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the global config directory
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "book-inventory", "book-inventory")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns the default config file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Checks the settings are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Invalid("api_url must not be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api_url must start with http:// or https://, got '{}'",
                url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Overrides the API URL (from a flag or environment variable)
    pub fn with_api_url(mut self, url: Option<String>) -> Result<Self, ConfigError> {
        if let Some(url) = url {
            self.api_url = url;
            self.validate()?;
        }
        Ok(self)
    }

    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Writes a commented default config file unless one already exists
    ///
    /// Returns true if a file was written.
    pub fn init_file(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let default_config = format!(
            r#"# Book inventory configuration

# Collection endpoint of the remote catalog
api_url = "{}"

# Upper bound on each request, in seconds
timeout_secs = 10

# Values a new record starts with
[draft]
quantity = 1
genre = ""
"#,
            DEFAULT_API_URL
        );

        fs::write(path, default_config)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(true)
    }

    /// Renders the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
