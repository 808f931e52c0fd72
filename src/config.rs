// src/config.rs
use log::{info, warn};
use std::env;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_PORT: u16 = 3030;
/// Five minutes, the staleness window the site's pages use.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_base_url: String,
    pub port: u16,
    pub cache_ttl: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_base_url: DEFAULT_BASE_URL.to_string(),
            port: DEFAULT_PORT,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl AppConfig {
    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        let data_base_url = match lookup("CPI_DATA_BASE_URL") {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => {
                warn!("$CPI_DATA_BASE_URL not set, defaulting to {}", DEFAULT_BASE_URL);
                defaults.data_base_url
            }
        };

        let port = match lookup("PORT") {
            Some(raw) => parse_number::<u16>("PORT", raw)?,
            None => {
                warn!("$PORT not set, defaulting to {}", DEFAULT_PORT);
                defaults.port
            }
        };

        let cache_ttl = match lookup("CPI_CACHE_TTL_SECS") {
            Some(raw) => Duration::from_secs(parse_number::<u64>("CPI_CACHE_TTL_SECS", raw)?),
            None => defaults.cache_ttl,
        };

        info!(
            "Config loaded: base_url={}, port={}, cache_ttl={}s",
            data_base_url,
            port,
            cache_ttl.as_secs()
        );

        Ok(AppConfig {
            data_base_url,
            port,
            cache_ttl,
        })
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidNumber { var, value: raw })
}
