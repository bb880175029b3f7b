//! # Application Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--db`)
//! 2. Environment variables (`STOCKBOOK_*`)
//! 3. Defaults (this file)
//!
//! Configuration is read-only after startup.

use directories::ProjectDirs;
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

use stockbook_core::render::DEFAULT_CURRENCY;
use stockbook_core::validation::validate_low_stock_threshold;
use stockbook_core::DEFAULT_LOW_STOCK_THRESHOLD;

use crate::error::{AppError, AppResult};

/// File name of the database inside the platform data directory.
pub const DATABASE_FILE: &str = "stockbook.db";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Explicit database path; `None` means the platform data directory.
    pub db_path: Option<PathBuf>,

    /// Shop name printed above reports.
    pub store_name: String,

    /// Label printed in front of amounts ("Rs.").
    pub currency: String,

    /// Stock level below which the inventory view flags a product.
    pub low_stock_threshold: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            db_path: None,
            store_name: "Tobacco Shop".to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl AppConfig {
    /// Creates the configuration from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `STOCKBOOK_DB_PATH`: database file
    /// - `STOCKBOOK_STORE_NAME`: shop name
    /// - `STOCKBOOK_CURRENCY`: amount label (e.g. "Rs.")
    /// - `STOCKBOOK_LOW_STOCK`: low stock threshold (non-negative integer)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = AppConfig::default();

        if let Some(path) = lookup("STOCKBOOK_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(name) = lookup("STOCKBOOK_STORE_NAME").filter(|n| !n.trim().is_empty()) {
            config.store_name = name.trim().to_string();
        }

        if let Some(currency) = lookup("STOCKBOOK_CURRENCY").filter(|c| !c.trim().is_empty()) {
            config.currency = currency.trim().to_string();
        }

        if let Some(raw) = lookup("STOCKBOOK_LOW_STOCK") {
            match raw.trim().parse::<i64>() {
                Ok(threshold) if validate_low_stock_threshold(threshold).is_ok() => {
                    config.low_stock_threshold = threshold;
                }
                _ => warn!(value = %raw, "Ignoring invalid STOCKBOOK_LOW_STOCK"),
            }
        }

        config
    }

    /// Resolves the database file path.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.stockbook.stockbook/stockbook.db`
    /// - **Windows**: `%APPDATA%\stockbook\stockbook\data\stockbook.db`
    /// - **Linux**: `~/.local/share/stockbook/stockbook.db`
    ///
    /// The data directory is created if it does not exist.
    pub fn database_path(&self, flag: Option<PathBuf>) -> AppResult<PathBuf> {
        if let Some(path) = flag.or_else(|| self.db_path.clone()) {
            return Ok(path);
        }

        let proj_dirs = ProjectDirs::from("com", "stockbook", "stockbook")
            .ok_or_else(|| AppError::internal("Could not determine app data directory"))?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DATABASE_FILE))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.currency, "Rs.");
        assert_eq!(config.low_stock_threshold, 10);
        assert!(config.db_path.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("STOCKBOOK_DB_PATH", "/tmp/shop.db"),
            ("STOCKBOOK_STORE_NAME", " Corner Pan Shop "),
            ("STOCKBOOK_CURRENCY", "PKR"),
            ("STOCKBOOK_LOW_STOCK", "25"),
        ]));

        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/shop.db")));
        assert_eq!(config.store_name, "Corner Pan Shop");
        assert_eq!(config.currency, "PKR");
        assert_eq!(config.low_stock_threshold, 25);
    }

    #[test]
    fn test_invalid_threshold_keeps_default() {
        for raw in ["abc", "-4", "", "2.5"] {
            let config = AppConfig::from_lookup(lookup(&[("STOCKBOOK_LOW_STOCK", raw)]));
            assert_eq!(config.low_stock_threshold, DEFAULT_LOW_STOCK_THRESHOLD, "{raw}");
        }
    }

    #[test]
    fn test_zero_threshold_disables_low_stock() {
        let config = AppConfig::from_lookup(lookup(&[("STOCKBOOK_LOW_STOCK", "0")]));
        assert_eq!(config.low_stock_threshold, 0);
    }

    #[test]
    fn test_flag_wins_over_env_path() {
        let config = AppConfig::from_lookup(lookup(&[("STOCKBOOK_DB_PATH", "/tmp/env.db")]));

        let path = config.database_path(Some(PathBuf::from("/tmp/flag.db"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/flag.db"));

        let path = config.database_path(None).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/env.db"));
    }
}
