//! Application configuration.
//!
//! # Responsibility
//! - Resolve where the database and log files live.
//! - Provide the log level and autosave interval.
//!
//! # Invariants
//! - Precedence, highest first: environment (`CODENOTE_*`), config file,
//!   defaults.
//! - A missing config file is not an error; defaults apply.

use crate::logging::default_log_level;
use crate::session::DEFAULT_AUTOSAVE_INTERVAL;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PREFIX: &str = "CODENOTE";
const APP_DIR_NAME: &str = "codenote";
const DATABASE_FILE_NAME: &str = "codenote.sqlite3";

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Autosave interval must be at least one second.
    InvalidAutosaveInterval(u64),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::InvalidAutosaveInterval(value) => {
                write!(f, "autosave_interval_secs must be >= 1, got {value}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::InvalidAutosaveInterval(_) => None,
        }
    }
}

/// Runtime configuration shared by the core and its front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Directory holding the SQLite database.
    pub data_dir: PathBuf,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    pub autosave_interval_secs: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            log_dir: data_dir.join("logs"),
            data_dir,
            log_level: default_log_level().to_string(),
            autosave_interval_secs: DEFAULT_AUTOSAVE_INTERVAL.as_secs(),
        }
    }
}

impl CoreConfig {
    /// Loads from `$CODENOTE_CONFIG` or the platform config directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Loads from `path`, falling back to defaults when it does not exist.
    /// Environment overrides are applied on top.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parses TOML without touching the file system or environment.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{ENV_PREFIX}_CONFIG")) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
            .join("config.toml")
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE_NAME)
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var(format!("{ENV_PREFIX}_DATA_DIR")) {
            if !value.is_empty() {
                self.data_dir = PathBuf::from(value);
            }
        }
        if let Ok(value) = std::env::var(format!("{ENV_PREFIX}_LOG_DIR")) {
            if !value.is_empty() {
                self.log_dir = PathBuf::from(value);
            }
        }
        if let Ok(value) = std::env::var(format!("{ENV_PREFIX}_LOG_LEVEL")) {
            if !value.is_empty() {
                self.log_level = value;
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.autosave_interval_secs == 0 {
            return Err(ConfigError::InvalidAutosaveInterval(0));
        }
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}
