//! Server configuration.
//!
//! # Responsibility
//! - Load settings from an optional TOML file.
//! - Apply `BELIEFS_*` environment overrides on top.
//! - Reject values the server cannot start with.

use beliefs_core::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const ENV_BIND_ADDR: &str = "BELIEFS_BIND_ADDR";
pub const ENV_DATABASE_PATH: &str = "BELIEFS_DATABASE_PATH";
pub const ENV_LOG_LEVEL: &str = "BELIEFS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "BELIEFS_LOG_DIR";
pub const ENV_ADMIN_TOKEN: &str = "BELIEFS_ADMIN_TOKEN";

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: Option<PathBuf>,
        source: toml::de::Error,
    },
    InvalidValue {
        key: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot read config file `{}`: {source}", path.display())
            }
            Self::Parse {
                path: Some(path),
                source,
            } => write!(f, "invalid config file `{}`: {source}", path.display()),
            Self::Parse { path: None, source } => write!(f, "invalid config: {source}"),
            Self::InvalidValue { key, message } => write!(f, "invalid `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::InvalidValue { .. } => None,
        }
    }
}

/// Effective runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling log files; stderr only when unset.
    pub log_dir: Option<PathBuf>,
    pub admin_tokens: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            database_path: PathBuf::from("beliefs.sqlite3"),
            log_level: default_log_level().to_string(),
            log_dir: None,
            admin_tokens: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Loads the file at `path` (if any), then process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::load`] with an injectable environment.
    pub fn load_with_env<F>(path: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                toml::from_str(&text).map_err(|source| ConfigError::Parse {
                    path: Some(path.to_path_buf()),
                    source,
                })?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses settings from TOML text without touching the environment.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(text).map_err(|source| ConfigError::Parse { path: None, source })?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = env(ENV_BIND_ADDR) {
            self.bind_addr = value
                .trim()
                .parse()
                .map_err(|err| ConfigError::InvalidValue {
                    key: "bind_addr",
                    message: format!("`{value}`: {err}"),
                })?;
        }
        if let Some(value) = env(ENV_DATABASE_PATH) {
            self.database_path = PathBuf::from(value);
        }
        if let Some(value) = env(ENV_LOG_LEVEL) {
            self.log_level = value;
        }
        if let Some(value) = env(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = env(ENV_ADMIN_TOKEN) {
            self.admin_tokens.push(value);
        }
        Ok(())
    }

    /// Checks values that deserialization alone cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "database_path",
                message: "must not be empty".to_string(),
            });
        }
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    key: "log_dir",
                    message: format!("must be an absolute path, got `{}`", dir.display()),
                });
            }
        }
        if self.admin_tokens.iter().any(|token| token.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "admin_tokens",
                message: "tokens must not be blank".to_string(),
            });
        }
        Ok(())
    }
}
