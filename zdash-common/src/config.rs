//! Configuration loading and config file resolution
//!
//! Bootstrap configuration comes from a TOML file. Resolution order for the
//! file itself:
//! 1. Explicit path (command-line `--config`)
//! 2. `ZDASH_CONFIG` environment variable
//! 3. `<platform config dir>/zdash/config.toml`
//! 4. Built-in defaults (no file)
//!
//! An explicitly named file that does not exist is an error. A missing file at
//! the default location is not: defaults are used and a warning is logged.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::models::LibraryType;
use crate::{Error, Result};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "ZDASH_CONFIG";

pub const DEFAULT_PORT: u16 = 5790;
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_ZOTERO_BASE_URL: &str = "https://api.zotero.org";
/// Collections with fewer sources than this are left off the radar breakdown
pub const DEFAULT_RADAR_CUTOFF: u32 = 20;

/// Bootstrap configuration loaded from TOML
#[derive(Clone, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Zotero library ID (user or group ID). When set together with
    /// `api_key` the library is fetched at startup.
    #[serde(default)]
    pub library_id: Option<u64>,

    /// Zotero Web API key
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub library_type: LibraryType,

    /// Zotero Web API base URL
    #[serde(default = "default_zotero_base_url")]
    pub zotero_base_url: String,

    /// Minimum source count for a collection to appear in the breakdown
    #[serde(default = "default_radar_cutoff")]
    pub radar_cutoff: u32,

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

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            library_id: None,
            api_key: None,
            library_type: LibraryType::default(),
            zotero_base_url: default_zotero_base_url(),
            radar_cutoff: default_radar_cutoff(),
            logging: LoggingConfig::default(),
        }
    }
}

// API key is redacted so configs can be logged with `{:?}`
impl std::fmt::Debug for TomlConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TomlConfig")
            .field("port", &self.port)
            .field("bind_address", &self.bind_address)
            .field("library_id", &self.library_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("library_type", &self.library_type)
            .field("zotero_base_url", &self.zotero_base_url)
            .field("radar_cutoff", &self.radar_cutoff)
            .field("logging", &self.logging)
            .finish()
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Library ID and API key, when both are configured
    pub fn credentials(&self) -> Option<(u64, &str)> {
        match (self.library_id, self.api_key.as_deref()) {
            (Some(id), Some(key)) if !key.trim().is_empty() => Some((id, key)),
            _ => None,
        }
    }
}

/// Default config file location for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("zdash").join("config.toml"))
}

/// Resolve and load configuration following the module-level priority order
pub fn resolve_config(cli_path: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = cli_path {
        return TomlConfig::load(path);
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return TomlConfig::load(Path::new(&path));
        }
    }

    match default_config_path() {
        Some(path) if path.exists() => TomlConfig::load(&path),
        Some(path) => {
            warn!(
                "No config file at {}, using built-in defaults",
                path.display()
            );
            Ok(TomlConfig::default())
        }
        None => {
            warn!("Could not determine config directory, using built-in defaults");
            Ok(TomlConfig::default())
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_zotero_base_url() -> String {
    DEFAULT_ZOTERO_BASE_URL.to_string()
}

fn default_radar_cutoff() -> u32 {
    DEFAULT_RADAR_CUTOFF
}

fn default_log_level() -> String {
    "info".to_string()
}
