//! Runtime configuration for hosts embedding the core.
//!
//! Values come from explicit construction or the environment:
//! - `GIFTLIST_DB_PATH` (default `giftlist.sqlite3`)
//! - `GIFTLIST_LOG_LEVEL` (default per build mode)
//! - `GIFTLIST_LOG_DIR` (unset: logging stays off)

use crate::logging::{default_log_level, LogLevel, LoggingError};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "GIFTLIST_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "GIFTLIST_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "GIFTLIST_LOG_DIR";
pub const DEFAULT_DB_FILE_NAME: &str = "giftlist.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: LogLevel,
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    /// - `UnsupportedLevel` when `GIFTLIST_LOG_LEVEL` is set to an unknown level.
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoggingError> {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let log_level = match value(LOG_LEVEL_ENV) {
            Some(level) => level.parse::<LogLevel>()?,
            None => defaults.log_level,
        };

        Ok(Self {
            db_path: value(DB_PATH_ENV).map_or(defaults.db_path, PathBuf::from),
            log_level,
            log_dir: value(LOG_DIR_ENV).map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::LogLevel;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_values_fall_back_to_defaults() {
        let config = CoreConfig::from_lookup(lookup(&[(DB_PATH_ENV, "  ")])).unwrap();
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn environment_values_override_defaults() {
        let config = CoreConfig::from_lookup(lookup(&[
            (DB_PATH_ENV, "/data/gifts.db"),
            (LOG_LEVEL_ENV, "WARN"),
            (LOG_DIR_ENV, "/var/log/giftlist"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/gifts.db"));
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/giftlist")));
    }

    #[test]
    fn unknown_level_is_an_error() {
        assert!(CoreConfig::from_lookup(lookup(&[(LOG_LEVEL_ENV, "chatty")])).is_err());
    }
}
