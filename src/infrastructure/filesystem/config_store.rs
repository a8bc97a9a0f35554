use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use validator::Validate;

use crate::domain::entities::workspace_config::{DEFAULT_CHAT_URL, DEFAULT_LOCALHOST_URL};

/// Directory under the user's config dir holding `config.yaml`
pub const CONFIG_DIR_NAME: &str = "pj";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Projects directory under the home directory when nothing else is set
pub const DEFAULT_PROJECTS_DIR_NAME: &str = "Projects";

/// Configuration store related errors
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("Configuration file not found at path: {0}")]
    ConfigFileNotFound(String),

    #[error("Configuration file read failed: {0}")]
    ReadFailed(String),

    #[error("YAML parsing failed in {path}: {message}")]
    YamlParsingFailed { path: String, message: String },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Cannot determine the home directory")]
    NoHomeDirectory,
}

fn default_editor_command() -> Vec<String> {
    vec!["cursor".to_string(), "{path}".to_string()]
}

fn default_browser_command() -> Vec<String> {
    vec![
        "google-chrome".to_string(),
        "--new-window".to_string(),
        "{url}".to_string(),
    ]
}

fn default_chat_url() -> String {
    DEFAULT_CHAT_URL.to_string()
}

fn default_localhost_url() -> String {
    DEFAULT_LOCALHOST_URL.to_string()
}

fn default_poll_attempts() -> u32 {
    50
}

fn default_poll_interval_ms() -> u64 {
    200
}

fn default_true() -> bool {
    true
}

/// Tool settings read from `config.yaml`
///
/// Every key is optional; a missing file means all defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    /// Root directory holding projects and `projects.json`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects_dir: Option<PathBuf>,

    /// Editor command template, `{path}` is the project directory
    #[serde(default = "default_editor_command")]
    #[validate(length(min = 1))]
    pub editor_command: Vec<String>,

    /// Browser command template, `{url}` is the page to open
    #[serde(default = "default_browser_command")]
    #[validate(length(min = 1))]
    pub browser_command: Vec<String>,

    /// Chat command template; the browser command when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_command: Option<Vec<String>>,

    #[serde(default = "default_chat_url")]
    #[validate(url)]
    pub default_chat_url: String,

    #[serde(default = "default_localhost_url")]
    #[validate(url)]
    pub default_localhost_url: String,

    #[serde(default = "default_poll_attempts")]
    #[validate(range(min = 1, max = 1000))]
    pub window_poll_attempts: u32,

    #[serde(default = "default_poll_interval_ms")]
    #[validate(range(max = 10000))]
    pub window_poll_interval_ms: u64,

    /// Minimize windows already on the target workspaces before launching
    #[serde(default = "default_true")]
    pub minimize_existing: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            projects_dir: None,
            editor_command: default_editor_command(),
            browser_command: default_browser_command(),
            chat_command: None,
            default_chat_url: default_chat_url(),
            default_localhost_url: default_localhost_url(),
            window_poll_attempts: default_poll_attempts(),
            window_poll_interval_ms: default_poll_interval_ms(),
            minimize_existing: default_true(),
        }
    }
}

impl AppConfig {
    /// Command template for the chat application
    pub fn chat_command(&self) -> &[String] {
        self.chat_command.as_deref().unwrap_or(&self.browser_command)
    }

    /// Projects directory: explicit override, then config, then `~/Projects`
    pub fn resolve_projects_dir(
        &self,
        override_dir: Option<&Path>,
    ) -> Result<PathBuf, ConfigStoreError> {
        if let Some(dir) = override_dir {
            return Ok(dir.to_path_buf());
        }

        let home = dirs::home_dir();
        match &self.projects_dir {
            Some(dir) => match (dir.strip_prefix("~"), home) {
                (Ok(rest), Some(home)) => Ok(home.join(rest)),
                (Ok(_), None) => Err(ConfigStoreError::NoHomeDirectory),
                (Err(_), _) => Ok(dir.clone()),
            },
            None => home
                .map(|home| home.join(DEFAULT_PROJECTS_DIR_NAME))
                .ok_or(ConfigStoreError::NoHomeDirectory),
        }
    }

    fn validate_commands(&self) -> Result<(), ConfigStoreError> {
        let commands = [
            ("editor_command", Some(&self.editor_command)),
            ("browser_command", Some(&self.browser_command)),
            ("chat_command", self.chat_command.as_ref()),
        ];

        for (field, command) in commands {
            if let Some(command) = command {
                if command.first().map_or(true, |program| program.trim().is_empty()) {
                    return Err(ConfigStoreError::ValidationFailed(format!(
                        "{}: program name cannot be empty",
                        field
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Location of the config file when `--config` is not given
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Reads and validates `AppConfig` from YAML
pub struct ConfigStore;

impl ConfigStore {
    /// Load the config from `explicit_path`, or from the default location
    ///
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub fn load(explicit_path: Option<&Path>) -> Result<AppConfig, ConfigStoreError> {
        let path = match explicit_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigStoreError::ConfigFileNotFound(
                        path.display().to_string(),
                    ));
                }
                path.to_path_buf()
            }
            None => match default_config_path().filter(|path| path.exists()) {
                Some(path) => path,
                None => {
                    debug!("No config file, using defaults");
                    return Ok(AppConfig::default());
                }
            },
        };

        Self::read_config(&path)
    }

    /// Read a config file and validate it
    pub fn read_config(config_path: &Path) -> Result<AppConfig, ConfigStoreError> {
        debug!("Reading config from {}", config_path.display());

        let contents = fs::read_to_string(config_path)
            .map_err(|e| ConfigStoreError::ReadFailed(e.to_string()))?;

        let config: AppConfig = if contents.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml::from_str(&contents).map_err(|e| ConfigStoreError::YamlParsingFailed {
                path: config_path.display().to_string(),
                message: e.to_string(),
            })?
        };

        config
            .validate()
            .map_err(|e| ConfigStoreError::ValidationFailed(e.to_string()))?;
        config.validate_commands()?;

        Ok(config)
    }
}
