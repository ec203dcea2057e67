//! Host configuration read from the process environment.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use stockroom_inventory::RestockPolicy;
use stockroom_observability::LogFormat;

pub const STATE_PATH_VAR: &str = "STOCKROOM_STATE_PATH";
pub const OVERWRITE_SUPPLIER_VAR: &str = "STOCKROOM_OVERWRITE_SUPPLIER";
pub const OVERWRITE_MIN_STOCK_VAR: &str = "STOCKROOM_OVERWRITE_MIN_STOCK";
pub const LOG_FORMAT_VAR: &str = "STOCKROOM_LOG_FORMAT";

pub const DEFAULT_STATE_PATH: &str = "stockroom-state.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Everything a ledger host needs to start.
///
/// Deserializable from a config document; missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub state_path: PathBuf,
    pub restock_policy: RestockPolicy,
    pub log_format: LogFormat,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            restock_policy: RestockPolicy::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl LedgerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let state_path = lookup(STATE_PATH_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.state_path);

        let overwrite_supplier = match lookup(OVERWRITE_SUPPLIER_VAR) {
            Some(v) => parse_bool(OVERWRITE_SUPPLIER_VAR, &v)?,
            None => defaults.restock_policy.overwrite_supplier,
        };
        let overwrite_min_stock = match lookup(OVERWRITE_MIN_STOCK_VAR) {
            Some(v) => parse_bool(OVERWRITE_MIN_STOCK_VAR, &v)?,
            None => defaults.restock_policy.overwrite_min_stock,
        };

        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                key: LOG_FORMAT_VAR,
                value: v,
            })?,
            None => defaults.log_format,
        };

        Ok(Self {
            state_path,
            restock_policy: RestockPolicy {
                overwrite_supplier,
                overwrite_min_stock,
            },
            log_format,
        })
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}
