//! Configuration loader — merges env vars, .env file, and config.toml.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use common::{Error, ShelfLifeTable, DEFAULT_SHELF_LIFE};
use history_store::storage::is_valid_key;
use history_store::DEFAULT_HISTORY_KEY;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub clock: ClockConfig,

    /// Shelf life in days, keyed by product name. Replaces the built-in
    /// table entirely when present.
    #[serde(default = "default_shelf_life")]
    pub shelf_life: BTreeMap<String, u32>,
}

/// Where the history lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per storage key.
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,

    /// Storage key of the history collection.
    #[serde(default = "default_history_key")]
    pub history_key: String,
}

/// Which calendar "today" is read from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Timezone {
    Utc,
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    #[serde(default = "default_timezone")]
    pub timezone: Timezone,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".expiry-predictor")
}
fn default_history_key() -> String {
    DEFAULT_HISTORY_KEY.into()
}
fn default_timezone() -> Timezone {
    Timezone::Local
}
fn default_shelf_life() -> BTreeMap<String, u32> {
    DEFAULT_SHELF_LIFE
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            history_key: default_history_key(),
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            clock: ClockConfig::default(),
            shelf_life: default_shelf_life(),
        }
    }
}

impl AppConfig {
    pub fn shelf_life_table(&self) -> Result<ShelfLifeTable, Error> {
        ShelfLifeTable::new(self.shelf_life.iter().map(|(k, v)| (k.as_str(), *v)))
    }
}

fn parse_timezone(raw: &str) -> Result<Timezone, Error> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "utc" => Ok(Timezone::Utc),
        "local" => Ok(Timezone::Local),
        _ => Err(Error::Config(
            "EXPIRY_TIMEZONE must be one of: utc, local".into(),
        )),
    }
}

pub fn validate_config(config: &AppConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.storage.dir.as_os_str().is_empty() {
        issues.push("storage.dir must not be empty".into());
    }
    if !is_valid_key(&config.storage.history_key) {
        issues.push(
            "storage.history_key may only contain ASCII letters, digits, '-' and '_'".into(),
        );
    }
    if config.shelf_life.is_empty() {
        issues.push("shelf_life must contain at least one product".into());
    } else if let Err(e) = config.shelf_life_table() {
        issues.push(e.to_string());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Parse a TOML config file.
pub fn read_config_file(path: &Path) -> Result<AppConfig, Error> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Load configuration from environment and optional config file.
///
/// An explicitly requested file must exist; the default `config.toml` is
/// optional.
pub fn load_config(explicit_path: Option<&Path>) -> Result<AppConfig, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Defaults, or the config file when there is one.
    let mut config = match explicit_path {
        Some(path) => read_config_file(path)?,
        None => {
            let path = Path::new(DEFAULT_CONFIG_PATH);
            if path.exists() {
                read_config_file(path)?
            } else {
                AppConfig::default()
            }
        }
    };

    // 3. Override with environment variables (highest priority).
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;

    validate_config(&config)?;

    Ok(config)
}

fn apply_env_overrides(
    config: &mut AppConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<(), Error> {
    if let Some(dir) = env("EXPIRY_STORAGE_DIR") {
        let trimmed = dir.trim();
        if !trimmed.is_empty() {
            config.storage.dir = PathBuf::from(trimmed);
        }
    }
    if let Some(key) = env("EXPIRY_HISTORY_KEY") {
        config.storage.history_key = key.trim().to_string();
    }
    if let Some(tz) = env("EXPIRY_TIMEZONE") {
        config.clock.timezone = parse_timezone(&tz)?;
    }
    Ok(())
}
