//! Application configuration.
//!
//! Settings come from config.toml (sync timing and the optional seed catalogue)
//! and from the environment (`DATABASE_URL`, `CONFIG_PATH`), optionally loaded
//! from a `.env` file by the binary.

/// Seed catalogue sections of config.toml
pub mod catalog;
/// `SQLite` connection and table creation
pub mod database;

use crate::errors::{Error, Result};
use catalog::{EmployeeSeed, ItemSeed, ProjectSeed, SeedCatalog, ToolSeed};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Sync timing
    #[serde(default)]
    pub sync: SyncConfig,
    /// Opening stock; built-in items if absent
    pub items: Option<Vec<ItemSeed>>,
    /// Employees; built-in employees if absent
    pub employees: Option<Vec<EmployeeSeed>>,
    /// Tool park; built-in tools if absent
    pub tools: Option<Vec<ToolSeed>>,
    /// Projects; built-in projects if absent
    pub projects: Option<Vec<ProjectSeed>>,
}

/// `[sync]` section: how the simulated upstream sync behaves.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SyncConfig {
    /// Seconds between two sync ticks while online
    pub interval_secs: u64,
    /// Simulated network latency of one sync, in milliseconds
    pub latency_ms: u64,
    /// Connectivity assumed at startup
    pub start_online: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            latency_ms: 1500,
            start_online: true,
        }
    }
}

impl SyncConfig {
    /// Tick period.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Simulated latency of one sync.
    #[must_use]
    pub const fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Checks the values the scheduler cannot run with.
    ///
    /// # Errors
    /// Returns [`Error::Config`] when `interval_secs` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            return Err(Error::Config {
                message: "sync.interval_secs must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl AppConfig {
    /// Builds the seed catalogue, taking each section from config.toml when present
    /// and from the built-in catalogue otherwise.
    #[must_use]
    pub fn seed_catalog(&self) -> SeedCatalog {
        let builtin = SeedCatalog::builtin();
        SeedCatalog {
            items: seeds_or(self.items.as_ref(), builtin.items),
            employees: seeds_or(self.employees.as_ref(), builtin.employees),
            tools: seeds_or(self.tools.as_ref(), builtin.tools),
            projects: seeds_or(self.projects.as_ref(), builtin.projects),
        }
    }
}

fn seeds_or<S, T>(configured: Option<&Vec<S>>, fallback: Vec<T>) -> Vec<T>
where
    S: Clone + Into<T>,
{
    configured.map_or(fallback, |seeds| seeds.iter().cloned().map(Into::into).collect())
}

/// Loads the configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    debug!("Loading configuration from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;

    let config: AppConfig = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.display()),
    })?;
    config.sync.validate()?;
    Ok(config)
}

/// Loads the configuration from `CONFIG_PATH` (default `./config.toml`).
///
/// A missing file is not an error: defaults are used and a warning is logged.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if !Path::new(&path).exists() {
        warn!("No configuration file at {}, using defaults", path);
        return Ok(AppConfig::default());
    }
    load_config(path)
}
