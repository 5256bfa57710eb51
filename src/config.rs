//! HTTP server configuration, read from the environment.

use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_LOG_FILE: &str = "development.log";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid PORT '{0}'")]
    InvalidPort(String),

    #[error("invalid {name} '{value}', expected true or false")]
    InvalidFlag { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub log_file: PathBuf,
    /// Pack the materials of one request in parallel.
    pub parallel: bool,
    pub sentry_dsn: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            parallel: false,
            sentry_dsn: None,
        }
    }
}

impl ServerConfig {
    /// Reads `PORT`, `OPTI_LOG_FILE`, `OPTI_PARALLEL` and `SENTRY_DSN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(port) = lookup("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Some(path) = lookup("OPTI_LOG_FILE").filter(|p| !p.is_empty()) {
            config.log_file = PathBuf::from(path);
        }
        if let Some(flag) = lookup("OPTI_PARALLEL") {
            config.parallel = parse_flag(&flag).ok_or_else(|| ConfigError::InvalidFlag {
                name: "OPTI_PARALLEL",
                value: flag.clone(),
            })?;
        }
        config.sentry_dsn = lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty());
        Ok(config)
    }

    pub fn addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
