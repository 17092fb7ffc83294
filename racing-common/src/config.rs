//! Bootstrap configuration loading
//!
//! The TOML file is optional. A missing file yields defaults; a file that
//! exists but does not parse is an error, since silently ignoring a typo in
//! credentials would send unidentified requests.
//!
//! # Settings Sources Priority
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. TOML configuration file (this module)
//! 4. Built-in defaults (code constants)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Application directory name under the platform config dir
const APP_DIR: &str = "racing-scraper";

/// Configuration file name
const CONFIG_FILE: &str = "config.toml";

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional; the scraper fills gaps from the environment and
/// built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Value of the `From` identification header
    #[serde(default)]
    pub email: Option<String>,

    /// Value of the `X-Partner` identification header
    #[serde(default)]
    pub partner: Option<String>,

    /// Root of the output tree
    #[serde(default)]
    pub base_dir: Option<PathBuf>,

    /// Comma-separated country selection (e.g. "AUS,NZL" or "ALL")
    #[serde(default)]
    pub countries: Option<String>,

    /// Comma-separated category selection (e.g. "T,G")
    #[serde(default)]
    pub categories: Option<String>,

    /// Override of the affiliate API base URL
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Minimum spacing between any two outbound requests
    #[serde(default)]
    pub request_delay_ms: Option<u64>,

    /// Pause between consecutive per-runner fetches
    #[serde(default)]
    pub runner_delay_ms: Option<u64>,

    /// Per-request timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Platform default location of the configuration file
///
/// Linux: `~/.config/racing-scraper/config.toml`, macOS:
/// `~/Library/Application Support/racing-scraper/config.toml`, Windows:
/// `%APPDATA%\racing-scraper\config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}

/// Parse configuration from TOML text
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    Ok(toml::from_str(content)?)
}

/// Load the configuration file
///
/// With an explicit path, a missing file is reported with a warning and
/// defaults are used. Without one, the platform default location is tried
/// quietly.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                warn!("Config file not found: {}, using defaults", path.display());
                return Ok(TomlConfig::default());
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                debug!("No config file found, using defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = parse_toml_config(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}
