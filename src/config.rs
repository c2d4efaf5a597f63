//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$MBOXDUMP_CONFIG` (environment variable)
//! 2. `~/.config/mboxdump/config.toml` (Linux/macOS)
//!    `%APPDATA%\mboxdump\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MboxError, Result};

/// File name of the log written inside `general.log_dir`.
pub const LOG_FILE_NAME: &str = "mboxdump.log";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Report rendering.
    pub report: ReportConfig,
    /// Archive and MIME parsing limits.
    pub parsing: ParsingConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Directory for `mboxdump.log`. No log file is written when unset.
    pub log_dir: Option<PathBuf>,
}

/// Report rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Placeholder printed for a missing header.
    pub null_placeholder: String,
    /// Print the full extracted record as JSON after each summary block.
    pub dump_records: bool,
}

/// Archive and MIME parsing limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Read buffer size in bytes (default: 1 MB).
    pub read_buffer_size: usize,
    /// Maximum message size in bytes (default: 256 MB). Larger messages are truncated.
    pub max_message_size: usize,
    /// Deepest MIME nesting level that is descended.
    pub max_mime_depth: usize,
    /// Line width handed to the HTML renderer.
    pub html_width: usize,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_dir: None,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            null_placeholder: "None".to_string(),
            dump_records: false,
        }
    }
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: 1024 * 1024,       // 1 MB
            max_message_size: 256 * 1024 * 1024, // 256 MB
            max_mime_depth: 10,
            html_width: 1024,
        }
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    let Some(path) = config_file_path() else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    match load_config_from(&path) {
        Ok(cfg) => {
            tracing::info!(path = %path.display(), "Loaded config");
            cfg
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to load config, using defaults"
            );
            Config::default()
        }
    }
}

/// Read and parse a specific configuration file.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path).map_err(|e| MboxError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    toml::from_str::<Config>(&contents).map_err(|e| MboxError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("MBOXDUMP_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("mboxdump").join("config.toml"))
}
