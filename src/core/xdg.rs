//! XDG Base Directory Support
//!
//! Resolves where Mojifinder looks for its configuration file and for a
//! full `UnicodeData.txt` name table on Linux/Unix systems.

use std::env;
use std::path::PathBuf;

/// File name of the optional full character name table in the data dir
pub const UNICODE_DATA_FILE: &str = "UnicodeData.txt";

/// XDG directory structure for Mojifinder
#[derive(Debug, Clone)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl XdgDirs {
    /// Create new XDG directory structure with proper resolution order
    ///
    /// Priority order (highest to lowest):
    /// 1. Explicit MOJIFINDER_* env vars
    /// 2. XDG_* environment variables
    /// 3. XDG defaults (~/.config, ~/.local/share)
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
            data_dir: Self::resolve_data_dir(),
        }
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(dir) = env::var("MOJIFINDER_CONFIG_DIR") {
            return PathBuf::from(dir);
        }

        if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("mojifinder");
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("mojifinder")
    }

    fn resolve_data_dir() -> PathBuf {
        if let Ok(dir) = env::var("MOJIFINDER_DATA_DIR") {
            return PathBuf::from(dir);
        }

        if let Ok(xdg) = env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("mojifinder");
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".local")
            .join("share")
            .join("mojifinder")
    }

    /// Get config file path
    pub fn config_file(&self) -> PathBuf {
        // MOJIFINDER_CONFIG_FILE is an explicit override
        if let Ok(file) = env::var("MOJIFINDER_CONFIG_FILE") {
            return PathBuf::from(file);
        }

        self.config_dir.join("config.toml")
    }

    /// Full name table installed in the data dir, if present
    pub fn unicode_data_file(&self) -> Option<PathBuf> {
        let path = self.data_dir.join(UNICODE_DATA_FILE);
        path.is_file().then_some(path)
    }

    /// Log all resolved paths
    pub fn log_paths(&self) {
        tracing::debug!("XDG paths:");
        tracing::debug!("  Config: {:?}", self.config_dir);
        tracing::debug!("  Data:   {:?}", self.data_dir);
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}
