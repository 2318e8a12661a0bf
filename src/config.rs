//! Process configuration from the environment.

use std::env;
use std::path::PathBuf;

use crate::data::DEFAULT_DATA_DIR;

pub const DATA_DIR_ENV: &str = "MOUNTFORGE_DATA_DIR";
pub const BIND_ENV: &str = "MOUNTFORGE_BIND";
pub const LOG_ENV: &str = "MOUNTFORGE_LOG";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub bind_addr: String,
    /// Tracing filter directive; `RUST_LOG` is the fallback.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            bind_addr: DEFAULT_BIND.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            data_dir: get(DATA_DIR_ENV).map(PathBuf::from).unwrap_or(defaults.data_dir),
            bind_addr: get(BIND_ENV).unwrap_or(defaults.bind_addr),
            log_filter: get(LOG_ENV).or_else(|| get("RUST_LOG")).unwrap_or(defaults.log_filter),
        }
    }
}
