//! Runtime configuration.
//!
//! Defaults, overridden by `FUTOSHIKI_*` environment variables, overridden in
//! turn by whatever the front end applies on top (command-line flags).

use crate::source::{self, CatalogSource, DEFAULT_CATALOG_URL};
use crate::store::{default_data_dir, FileStore, MemoryStore, StateBackend};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Where state lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    /// Normal play - file-based storage
    Local,
    /// Testing - in-memory storage, nothing touches disk
    Test,
}

impl Environment {
    /// Detect environment from the FUTOSHIKI_ENV variable
    pub fn detect() -> Self {
        Self::from_var(std::env::var("FUTOSHIKI_ENV").ok().as_deref())
    }

    fn from_var(value: Option<&str>) -> Self {
        match value {
            Some("test") | Some("testing") => Environment::Test,
            _ => Environment::Local,
        }
    }
}

/// Configuration for a game host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Catalog URL or local JSON path
    pub catalog: String,
    /// Directory for saved state and logs
    pub data_dir: PathBuf,
    /// Catalog fetch timeout
    pub timeout_secs: u64,
    pub environment: Environment,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: DEFAULT_CATALOG_URL.to_string(),
            data_dir: default_data_dir(),
            timeout_secs: 10,
            environment: Environment::Local,
        }
    }
}

impl Config {
    /// Defaults with environment variable overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_vars(|name| std::env::var(name).ok());
        config
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(catalog) = var("FUTOSHIKI_CATALOG") {
            self.catalog = catalog;
        }
        if let Some(dir) = var("FUTOSHIKI_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(secs) = var("FUTOSHIKI_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => log::warn!("ignoring invalid FUTOSHIKI_TIMEOUT_SECS={}", secs),
            }
        }
        self.environment = Environment::from_var(var("FUTOSHIKI_ENV").as_deref());
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The catalog source this configuration points at
    pub fn catalog_source(&self) -> Box<dyn CatalogSource> {
        source::source_for(&self.catalog, self.timeout())
    }

    /// The storage backend for this environment
    pub fn state_backend(&self) -> Arc<dyn StateBackend> {
        match self.environment {
            Environment::Local => Arc::new(FileStore::new(&self.data_dir)),
            Environment::Test => Arc::new(MemoryStore::new()),
        }
    }

    /// Path of the log file inside the data directory
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("futoshiki.log")
    }
}
