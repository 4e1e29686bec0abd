// Book Catalog - library catalog data layer
// Copyright (C) 2025 Book Catalog contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Catalog configuration
//!
//! Settings come from three layers, later ones winning:
//! 1. Built-in defaults
//! 2. Optional JSON file (`CatalogConfig::load`)
//! 3. Environment variables (`CATALOG_DATABASE_PATH`, `CATALOG_TOP_N`, `CATALOG_LOG`)
//!
//! # Example
//! ```json
//! {
//!   "database_path": "/var/lib/catalog/catalog.db",
//!   "top_n": 4,
//!   "log_filter": "catalog_core=debug"
//! }
//! ```

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_DATABASE_PATH: &str = "CATALOG_DATABASE_PATH";
pub const ENV_TOP_N: &str = "CATALOG_TOP_N";
pub const ENV_LOG: &str = "CATALOG_LOG";

/// Runtime configuration for the catalog data layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Connection pool size
    pub max_connections: u32,
    /// How long a connection waits on a locked database
    pub busy_timeout_secs: u64,
    /// Number of authors/books shown on the landing view
    pub top_n: i64,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            max_connections: 5,
            busy_timeout_secs: 30,
            top_n: 4,
            log_filter: "info".to_string(),
        }
    }
}

impl CatalogConfig {
    /// Load configuration from a JSON file, then apply environment overrides
    ///
    /// Missing keys fall back to defaults. A missing file is an error; use
    /// `from_env` when no file is expected.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::ConfigurationError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut config: CatalogConfig = serde_json::from_str(&data)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides using the given variable lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DATABASE_PATH) {
            self.database_path = PathBuf::from(path);
        }

        if let Some(top_n) = lookup(ENV_TOP_N) {
            self.top_n = top_n.trim().parse().map_err(|e| {
                CatalogError::ConfigurationError(format!("{} must be an integer: {}", ENV_TOP_N, e))
            })?;
        }

        if let Some(filter) = lookup(ENV_LOG) {
            self.log_filter = filter;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_n < 1 {
            return Err(CatalogError::ConfigurationError(
                "top_n must be at least 1".to_string(),
            ));
        }
        if self.max_connections < 1 {
            return Err(CatalogError::ConfigurationError(
                "max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Get default database path for the platform
///
/// - macOS: ~/Library/Application Support/BookCatalog/catalog.db
/// - Linux: ~/.local/share/BookCatalog/catalog.db
/// - Windows: %APPDATA%/BookCatalog/catalog.db
pub fn default_database_path() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home)
            .join("Library")
            .join("Application Support")
            .join("BookCatalog")
            .join("catalog.db")
    }

    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("BookCatalog")
            .join("catalog.db")
    }

    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(appdata).join("BookCatalog").join("catalog.db")
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        PathBuf::from("./catalog.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.top_n, 4);
        assert_eq!(config.max_connections, 5);
        assert!(config.database_path.ends_with("catalog.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_DATABASE_PATH, "/tmp/other.db"),
            (ENV_TOP_N, "10"),
            (ENV_LOG, "debug"),
        ]
        .into_iter()
        .collect();

        let mut config = CatalogConfig::default();
        config
            .apply_env(|key| vars.get(key).map(|v| v.to_string()))
            .expect("Failed to apply overrides");

        assert_eq!(config.database_path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.top_n, 10);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_bad_top_n() {
        let mut config = CatalogConfig::default();
        let result = config.apply_env(|key| (key == ENV_TOP_N).then(|| "four".to_string()));
        assert!(matches!(result, Err(CatalogError::ConfigurationError(_))));

        config.top_n = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, r#"{ "database_path": "/srv/catalog.db", "top_n": 6 }"#)
            .expect("Failed to write config");

        let config = CatalogConfig::load(&path).expect("Failed to load config");

        assert_eq!(config.database_path, PathBuf::from("/srv/catalog.db"));
        assert_eq!(config.top_n, 6);
        assert_eq!(config.busy_timeout_secs, 30);
    }

    #[test]
    fn test_load_missing_file() {
        let result = CatalogConfig::load("/definitely/not/here.json");
        assert!(matches!(result, Err(CatalogError::ConfigurationError(_))));
    }
}
