//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\family-shelf\config.toml
//! - macOS: ~/Library/Application Support/family-shelf/config.toml
//! - Linux: ~/.config/family-shelf/config.toml
//!
//! API keys may also come from the `STEAM_API_KEY` and
//! `STEAMGRIDDB_API_KEY` environment variables, which take precedence over
//! the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::sync::PinnedTitle;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials
    pub credentials: Credentials,

    /// Database location
    pub database: DatabaseConfig,

    /// Outbound HTTP settings
    pub http: HttpConfig,

    /// Synchronization tuning
    pub sync: SyncConfig,

    /// Replacement for the built-in pinned title set
    pub pinned: Option<Vec<PinnedTitle>>,
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Steam Web API key (profiles and owned games)
    pub steam_api_key: Option<String>,

    /// SteamGridDB key for curated cover art; covers are skipped without it
    pub steamgriddb_api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(crate::db::DEFAULT_DB_NAME),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout for every external service
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 4 }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Maximum metadata lookups in flight during one sync run
    pub metadata_concurrency: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            metadata_concurrency: crate::sync::DEFAULT_METADATA_CONCURRENCY,
        }
    }
}

impl Config {
    /// Fill credentials from the environment, overriding file values.
    pub fn apply_env(&mut self) {
        if let Some(key) = non_empty_env("STEAM_API_KEY") {
            self.credentials.steam_api_key = Some(key);
        }
        if let Some(key) = non_empty_env("STEAMGRIDDB_API_KEY") {
            self.credentials.steamgriddb_api_key = Some(key);
        }
    }

    /// The Steam key, required for any platform call.
    pub fn steam_api_key(&self) -> Result<&str, ConfigError> {
        self.credentials
            .steam_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingCredential("steam_api_key"))
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("family-shelf"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location.
///
/// Returns default config if the file doesn't exist or can't be parsed.
pub fn load() -> Config {
    match config_path() {
        Some(path) => load_from(&path),
        None => {
            tracing::warn!("Could not determine config directory, using defaults");
            Config::default()
        }
    }
}

/// Load configuration from an explicit path.
///
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the given path.
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

/// Save configuration to the default location.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Missing credential `{0}` (set it in config.toml or the environment)")]
    MissingCredential(&'static str),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[database]"));
        assert!(toml.contains("[http]"));
        assert!(toml.contains("[sync]"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[credentials]
steam_api_key = "my-key"

[[pinned]]
id = 900100
name = "Backyard Cricket"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.steam_api_key().unwrap(), "my-key");
        assert!(config.credentials.steamgriddb_api_key.is_none());
        assert_eq!(config.http.timeout(), Duration::from_secs(4));
        assert_eq!(config.sync.metadata_concurrency, 4);

        let pinned = config.pinned.unwrap();
        assert_eq!(pinned.len(), 1);
        assert_eq!(pinned[0].id, 900100);
        assert_eq!(pinned[0].name, "Backyard Cricket");
    }

    #[test]
    fn test_missing_steam_key_is_error() {
        let mut config = Config::default();
        assert!(matches!(
            config.steam_api_key(),
            Err(ConfigError::MissingCredential("steam_api_key"))
        ));

        config.credentials.steam_api_key = Some("   ".to_string());
        assert!(config.steam_api_key().is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.credentials.steam_api_key = Some("abc123".to_string());
        config.http.timeout_secs = 9;
        save_to(&config, &path).unwrap();

        let loaded = load_from(&path);
        assert_eq!(loaded.credentials.steam_api_key.as_deref(), Some("abc123"));
        assert_eq!(loaded.http.timeout_secs, 9);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("absent.toml"));
        assert!(config.pinned.is_none());
        assert_eq!(config.database.path, PathBuf::from(crate::db::DEFAULT_DB_NAME));
    }
}
