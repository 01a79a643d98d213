//! Process configuration read from the environment at startup.
//!
//! # Environment Variables
//!
//! - `STORAGE_MODE`: `mongo` (default) | `in_memory`
//! - `MONGODB_URI`: connection URI (default: `mongodb://localhost:27017`)
//! - `MONGODB_DATABASE`: database name (default: `todo-app`)
//! - `MONGODB_COLLECTION`: collection name (default: `todo`)
//! - `HOST`: listen IP address (default: `0.0.0.0`)
//! - `PORT`: listen port (default: `9000`)
//! - `STORAGE_TIMEOUT_SECS`: connect + ping budget, also used for disconnect (default: `10`)
//! - `SHUTDOWN_GRACE_SECS`: time in-flight requests get to finish on shutdown (default: `30`)
//! - `REQUEST_TIMEOUT_SECS`: per-request timeout (default: `60`)
//!
//! Empty values count as unset. Anything else that does not parse is an
//! error rather than a silent fallback to the default.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Errors produced while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid STORAGE_MODE: {0} (expected `mongo` or `in_memory`)")]
    InvalidStorageMode(String),

    #[error("invalid {key}: {value:?} (expected a positive integer)")]
    InvalidNumber { key: &'static str, value: String },

    #[error("invalid listen address: {0}")]
    InvalidAddress(String),
}

/// Which backend holds the todos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    #[default]
    Mongo,
    InMemory,
}

impl FromStr for StorageMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "in_memory" | "inmemory" | "memory" => Ok(Self::InMemory),
            _ => Err(ConfigError::InvalidStorageMode(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub storage_mode: StorageMode,
    pub mongo_uri: String,
    pub database: String,
    pub collection: String,
    pub host: String,
    pub port: u16,
    pub storage_timeout: Duration,
    pub shutdown_grace: Duration,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_mode: StorageMode::default(),
            mongo_uri: "mongodb://localhost:27017".to_string(),
            database: "todo-app".to_string(),
            collection: "todo".to_string(),
            host: "0.0.0.0".to_string(),
            port: 9000,
            storage_timeout: Duration::from_secs(10),
            shutdown_grace: Duration::from_secs(30),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl Config {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let storage_mode = match get("STORAGE_MODE") {
            Some(value) => value.parse()?,
            None => defaults.storage_mode,
        };
        let port = match get("PORT") {
            Some(value) => value
                .parse::<u16>()
                .ok()
                .filter(|port| *port > 0)
                .ok_or(ConfigError::InvalidNumber { key: "PORT", value })?,
            None => defaults.port,
        };

        Ok(Self {
            storage_mode,
            mongo_uri: get("MONGODB_URI").unwrap_or(defaults.mongo_uri),
            database: get("MONGODB_DATABASE").unwrap_or(defaults.database),
            collection: get("MONGODB_COLLECTION").unwrap_or(defaults.collection),
            host: get("HOST").unwrap_or(defaults.host),
            port,
            storage_timeout: seconds(get("STORAGE_TIMEOUT_SECS"), "STORAGE_TIMEOUT_SECS")?
                .unwrap_or(defaults.storage_timeout),
            shutdown_grace: seconds(get("SHUTDOWN_GRACE_SECS"), "SHUTDOWN_GRACE_SECS")?
                .unwrap_or(defaults.shutdown_grace),
            request_timeout: seconds(get("REQUEST_TIMEOUT_SECS"), "REQUEST_TIMEOUT_SECS")?
                .unwrap_or(defaults.request_timeout),
        })
    }

    pub fn listen_address(&self) -> Result<SocketAddr, ConfigError> {
        let address = format!("{}:{}", self.host, self.port);
        address
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(address))
    }
}

fn seconds(value: Option<String>, key: &'static str) -> Result<Option<Duration>, ConfigError> {
    value
        .map(|value| match value.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(ConfigError::InvalidNumber { key, value }),
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(config_from(&[]).unwrap(), Config::default());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("STORAGE_MODE", "in_memory"),
            ("MONGODB_URI", "mongodb://db:27017"),
            ("PORT", "8080"),
            ("STORAGE_TIMEOUT_SECS", "3"),
            ("SHUTDOWN_GRACE_SECS", " 5 "),
        ])
        .unwrap();

        assert_eq!(config.storage_mode, StorageMode::InMemory);
        assert_eq!(config.mongo_uri, "mongodb://db:27017");
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage_timeout, Duration::from_secs(3));
        assert_eq!(config.shutdown_grace, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn empty_values_count_as_unset() {
        let config = config_from(&[("PORT", ""), ("MONGODB_DATABASE", "  ")]).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.database, "todo-app");
    }

    #[test]
    fn rejects_invalid_values() {
        assert_eq!(
            config_from(&[("STORAGE_MODE", "sqlite")]),
            Err(ConfigError::InvalidStorageMode("sqlite".to_string()))
        );
        assert_eq!(
            config_from(&[("PORT", "http")]),
            Err(ConfigError::InvalidNumber {
                key: "PORT",
                value: "http".to_string()
            })
        );
        assert_eq!(
            config_from(&[("SHUTDOWN_GRACE_SECS", "0")]),
            Err(ConfigError::InvalidNumber {
                key: "SHUTDOWN_GRACE_SECS",
                value: "0".to_string()
            })
        );
    }

    #[test]
    fn listen_address_combines_host_and_port() {
        let config = config_from(&[("HOST", "127.0.0.1"), ("PORT", "9001")]).unwrap();
        assert_eq!(
            config.listen_address().unwrap(),
            "127.0.0.1:9001".parse::<SocketAddr>().unwrap()
        );

        let config = config_from(&[("HOST", "not a host")]).unwrap();
        assert!(matches!(
            config.listen_address(),
            Err(ConfigError::InvalidAddress(_))
        ));
    }
}
