//! Runtime settings.
//!
//! Defaults can be overridden through environment variables, which may come
//! from a `.env` file loaded with `dotenv`.

use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Largest division plan the request layer returns.
pub const ENV_MAX_SUBNETS: &str = "IP_TOOLBOX_MAX_SUBNETS";
/// Per-lookup DNS timeout in milliseconds.
pub const ENV_DNS_TIMEOUT_MS: &str = "IP_TOOLBOX_DNS_TIMEOUT_MS";
/// Concurrent DNS lookups per query.
pub const ENV_DNS_WORKERS: &str = "IP_TOOLBOX_DNS_WORKERS";
/// Path of the log4rs YAML file.
pub const ENV_LOG_CONFIG: &str = "IP_TOOLBOX_LOG_CONFIG";

pub const DEFAULT_MAX_SUBNETS: usize = 65_536;
pub const DEFAULT_DNS_TIMEOUT_MSEC: u64 = 3000;
pub const DEFAULT_DNS_WORKERS: usize = 3;
pub const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name}={value:?} is not a valid value: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub max_subnets: usize,
    pub dns_timeout: Duration,
    pub dns_workers: usize,
    pub log_config: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_subnets: DEFAULT_MAX_SUBNETS,
            dns_timeout: Duration::from_millis(DEFAULT_DNS_TIMEOUT_MSEC),
            dns_workers: DEFAULT_DNS_WORKERS,
            log_config: DEFAULT_LOG_CONFIG.to_string(),
        }
    }
}

impl Config {
    /// Load `.env` (if present) and read overrides from the process environment.
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenv::dotenv().ok();
        Config::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(v) = parse_var::<usize>(&lookup, ENV_MAX_SUBNETS)? {
            config.max_subnets = positive(ENV_MAX_SUBNETS, v)?;
        }
        if let Some(v) = parse_var::<u64>(&lookup, ENV_DNS_TIMEOUT_MS)? {
            config.dns_timeout = Duration::from_millis(positive(ENV_DNS_TIMEOUT_MS, v)?);
        }
        if let Some(v) = parse_var::<usize>(&lookup, ENV_DNS_WORKERS)? {
            config.dns_workers = positive(ENV_DNS_WORKERS, v)?;
        }
        if let Some(path) = lookup(ENV_LOG_CONFIG) {
            config.log_config = path;
        }
        log::trace!("config={config:?}");
        Ok(config)
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            match parsed {
                Ok(v) => Ok(Some(v)),
                Err(e) => Err(ConfigError::Invalid {
                    name,
                    reason: e.to_string(),
                    value,
                }),
            }
        }
    }
}

fn positive<T: PartialEq + Default + ToString>(name: &'static str, v: T) -> Result<T, ConfigError> {
    if v == T::default() {
        return Err(ConfigError::Invalid {
            name,
            value: v.to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }
    Ok(v)
}
