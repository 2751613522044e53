//! Configuration management for the Mojifinder service.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{FinderError, Result};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Highest Unicode code point
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listener and session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host or IP address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to bind (0 picks an ephemeral port)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Longest accepted query line in bytes, newline included
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,

    /// Close sessions idle at the prompt for this long (0 = never)
    #[serde(default)]
    pub idle_timeout_sec: u64,

    /// How long shutdown waits for in-flight sessions
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_sec: u64,

    /// Maximum concurrent sessions (0 = unlimited)
    #[serde(default)]
    pub max_connections: usize,
}

/// Character index configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    /// `UnicodeData.txt`-format name table; the bundled table is used when unset
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Lowest code point indexed
    #[serde(default = "default_first_code_point")]
    pub first_code_point: u32,

    /// Highest code point indexed (inclusive)
    #[serde(default = "default_last_code_point")]
    pub last_code_point: u32,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = FinderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(FinderError::ConfigError(format!(
                "Unknown log format '{other}' (expected 'text' or 'json')"
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,

    /// Default level for the crate when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    2323
}

fn default_max_line_length() -> usize {
    64 * 1024
}

fn default_shutdown_grace() -> u64 {
    5
}

fn default_first_code_point() -> u32 {
    32
}

fn default_last_code_point() -> u32 {
    MAX_CODE_POINT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_line_length: default_max_line_length(),
            idle_timeout_sec: 0,
            shutdown_grace_sec: default_shutdown_grace(),
            max_connections: 0,
        }
    }
}

impl ServerConfig {
    /// Idle timeout at the read suspension point, if enabled
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_sec > 0).then(|| Duration::from_secs(self.idle_timeout_sec))
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_sec)
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            first_code_point: default_first_code_point(),
            last_code_point: default_last_code_point(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| FinderError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order for the file:
    /// 1. `explicit` path (the `--config` flag)
    /// 2. MOJIFINDER_CONFIG env var
    /// 3. XDG config file (~/.config/mojifinder/config.toml)
    /// 4. ./mojifinder.toml
    /// 5. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs, explicit: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit {
            Self::from_file(path)?
        } else if let Ok(config_path) = env::var("MOJIFINDER_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("mojifinder.toml").exists() {
                Self::from_file("mojifinder.toml")?
            } else {
                Self::default()
            }
        };

        // A full name table dropped into the data dir beats the bundled one
        if config.index.data_file.is_none() {
            config.index.data_file = xdg.unicode_data_file();
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Server configuration
        if let Ok(host) = env::var("MOJIFINDER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("MOJIFINDER_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(max_line) = env::var("MOJIFINDER_MAX_LINE_LENGTH") {
            if let Ok(len) = max_line.parse() {
                self.server.max_line_length = len;
            }
        }
        if let Ok(idle) = env::var("MOJIFINDER_IDLE_TIMEOUT_SEC") {
            if let Ok(t) = idle.parse() {
                self.server.idle_timeout_sec = t;
            }
        }
        if let Ok(grace) = env::var("MOJIFINDER_SHUTDOWN_GRACE_SEC") {
            if let Ok(t) = grace.parse() {
                self.server.shutdown_grace_sec = t;
            }
        }
        if let Ok(max_conn) = env::var("MOJIFINDER_MAX_CONNECTIONS") {
            if let Ok(max) = max_conn.parse() {
                self.server.max_connections = max;
            }
        }

        // Index configuration
        if let Ok(data_file) = env::var("MOJIFINDER_DATA_FILE") {
            self.index.data_file = Some(PathBuf::from(data_file));
        }

        // Logging configuration
        if let Ok(format) = env::var("MOJIFINDER_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }
        if let Ok(level) = env::var("MOJIFINDER_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(FinderError::ConfigError(
                "Host must not be empty".to_string(),
            ));
        }

        if self.server.max_line_length == 0 {
            return Err(FinderError::ConfigError(
                "Max line length must be non-zero".to_string(),
            ));
        }

        if self.index.last_code_point > MAX_CODE_POINT {
            return Err(FinderError::ConfigError(format!(
                "Last code point must not exceed U+{MAX_CODE_POINT:04X}"
            )));
        }

        if self.index.first_code_point >= self.index.last_code_point {
            return Err(FinderError::ConfigError(
                "First code point must be below last code point".to_string(),
            ));
        }

        Ok(())
    }

    /// Log effective configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Bind: {}:{}", self.server.host, self.server.port);
        tracing::info!("  Max line length: {} bytes", self.server.max_line_length);
        match self.server.idle_timeout() {
            Some(t) => tracing::info!("  Idle timeout: {}s", t.as_secs()),
            None => tracing::info!("  Idle timeout: disabled"),
        }
        tracing::info!("  Shutdown grace: {}s", self.server.shutdown_grace_sec);
        if self.server.max_connections > 0 {
            tracing::info!("  Max connections: {}", self.server.max_connections);
        } else {
            tracing::info!("  Max connections: unlimited");
        }
        match &self.index.data_file {
            Some(path) => tracing::info!("  Name table: {:?}", path),
            None => tracing::info!("  Name table: bundled"),
        }
        tracing::info!(
            "  Code points: U+{:04X}..=U+{:04X}",
            self.index.first_code_point,
            self.index.last_code_point
        );
    }
}
