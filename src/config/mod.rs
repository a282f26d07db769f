mod env_manager;

use crate::error::{DocError, Result};
use crate::utils::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use env_manager::{get_env_value, API_KEY_VAR, BASE_URL_VAR};

/// Main configuration struct for the application
///
/// Holds the model endpoint settings, the retry policy for model calls and
/// the directories used for cloned repositories and generated output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Credential for the completion endpoint
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model endpoint settings
    pub model: ModelSettings,
    /// Retry settings for model calls
    pub retry: RetrySettings,
    /// Directory configuration
    pub paths: PathSettings,
}

/// Settings for the OpenAI-compatible completion endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Base URL of the API, without the `/chat/completions` suffix
    pub endpoint: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum completion size requested per call
    pub max_tokens: u32,
    /// HTTP timeout per request
    pub timeout_seconds: u64,
}

/// Retry settings for model calls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Fixed pause between attempts
    pub delay_seconds: u64,
}

/// Locations on disk used by a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Where repositories are cloned to
    pub repos_dir: PathBuf,
    /// Where the documentation tree is written
    pub output_dir: PathBuf,
    /// Log file appended to during a run, if any
    pub log_file: Option<PathBuf>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            temperature: 0.2,
            max_tokens: 4000,
            timeout_seconds: 120,
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_seconds: 5,
        }
    }
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            repos_dir: PathBuf::from("repos"),
            output_dir: PathBuf::from("output"),
            log_file: Some(PathBuf::from("documentation_system.log")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: ModelSettings::default(),
            retry: RetrySettings::default(),
            paths: PathSettings::default(),
        }
    }
}

impl RetrySettings {
    /// Converts the settings into the policy object used by the model client
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_secs(self.delay_seconds))
    }
}

impl Config {
    /// Loads configuration from an explicit file, or from the default config
    /// file location when `path` is `None`.
    ///
    /// A missing default file yields the default configuration; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&config_path).map_err(|e| {
            DocError::Config(format!(
                "Failed to read config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parses a TOML document into a configuration
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("llamadocgen").join("config.toml"))
    }

    /// Fills unset values from the process environment
    pub fn apply_env(&mut self) {
        if self.api_key.is_none() {
            self.api_key = get_env_value(API_KEY_VAR);
        }
        if let Some(endpoint) = get_env_value(BASE_URL_VAR) {
            self.model.endpoint = endpoint;
        }
    }

    /// Validates value ranges
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(DocError::Config(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.model.temperature
            )));
        }
        if self.model.max_tokens == 0 {
            return Err(DocError::Config("max_tokens must be positive".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(DocError::Config("retry.max_attempts must be at least 1".into()));
        }
        if self.model.endpoint.trim().is_empty() {
            return Err(DocError::Config("model endpoint is empty".into()));
        }
        Ok(())
    }

    /// Returns the API key, or `MissingApiKey` when none was configured
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(DocError::MissingApiKey),
        }
    }
}
