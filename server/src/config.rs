//! Runtime configuration, read once from the environment at startup.

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Which document store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Redis,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(StoreKind::Redis),
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("unknown store kind {other:?}, expected redis or memory")),
        }
    }
}

/// Where the collection lives in the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub kind: StoreKind,
    pub url: String,
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub request_timeout: Duration,
    pub log_level: String,
    pub store: StoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 9000)),
            request_timeout: Duration::from_secs(60),
            log_level: "info".to_string(),
            store: StoreConfig {
                kind: StoreKind::Redis,
                url: "redis://127.0.0.1:6379".to_string(),
                database: "demo_todo".to_string(),
                collection: "todo".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source, falling back to the
    /// defaults for anything unset. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        let host: IpAddr = parse_or(&get, "TODO_LISTEN_ADDR", defaults.listen_addr.ip())?;
        let port: u16 = parse_or(&get, "PORT", defaults.listen_addr.port())?;
        let timeout_secs: u64 = parse_or(
            &get,
            "TODO_REQUEST_TIMEOUT_SECS",
            defaults.request_timeout.as_secs(),
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "TODO_REQUEST_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "timeout must be at least one second".to_string(),
            });
        }

        Ok(Config {
            listen_addr: SocketAddr::new(host, port),
            request_timeout: Duration::from_secs(timeout_secs),
            log_level: get("TODO_LOG").unwrap_or(defaults.log_level),
            store: StoreConfig {
                kind: parse_or(&get, "TODO_STORE", defaults.store.kind)?,
                url: get("REDIS_URL").unwrap_or(defaults.store.url),
                database: get("TODO_DATABASE").unwrap_or(defaults.store.database),
                collection: get("TODO_COLLECTION").unwrap_or(defaults.store.collection),
            },
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|e| ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            })
        }
    }
}
