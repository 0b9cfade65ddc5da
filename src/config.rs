use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    // Spotify
    pub client_id: String,
    pub client_secret: String,
    pub market: String,

    // Datos
    pub themes_csv: PathBuf,

    // Caché
    pub cache_ttl: u64, // En segundos
    pub cache_capacity: usize,

    // Red y límites
    pub request_timeout: u64, // En segundos
    pub default_limit: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// `load` uses the process environment; tests pass a map so they never
    /// touch global state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| Error::Configuration(format!("{} not found in environment", key)))
        };

        let config = Self {
            // Spotify
            client_id: required("SPOTIPY_CLIENT_ID")?,
            client_secret: required("SPOTIPY_CLIENT_SECRET")?,
            market: lookup("MARKET").unwrap_or_else(|| "FR".to_string()),

            // Datos
            themes_csv: lookup("THEMES_CSV")
                .unwrap_or_else(|| "data/spotify_genres_themes.csv".to_string())
                .into(),

            // Caché
            cache_ttl: parse_var(&lookup, "CACHE_TTL", "300")?, // 5 minutos
            cache_capacity: parse_var(&lookup, "CACHE_CAPACITY", "1000")?,

            // Red y límites
            request_timeout: parse_var(&lookup, "REQUEST_TIMEOUT", "5")?,
            default_limit: parse_var(&lookup, "DEFAULT_LIMIT", "20")?,
        };

        // Validate configuration before returning
        config.validate()?;

        Ok(config)
    }

    /// Validates configuration values for correctness.
    ///
    /// # Validation Rules
    ///
    /// - Cache TTL and capacity must be greater than 0
    /// - Request timeout must be greater than 0
    /// - Default limit must be greater than 0
    /// - Market must be a two-letter country code
    pub fn validate(&self) -> Result<()> {
        if self.cache_ttl == 0 {
            return Err(Error::Configuration("Cache TTL must be greater than 0".into()));
        }

        if self.cache_capacity == 0 {
            return Err(Error::Configuration("Cache capacity must be greater than 0".into()));
        }

        if self.request_timeout == 0 {
            return Err(Error::Configuration("Request timeout must be greater than 0".into()));
        }

        if self.default_limit == 0 {
            return Err(Error::Configuration("Default limit must be greater than 0".into()));
        }

        if self.market.len() != 2 || !self.market.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(Error::Configuration(format!(
                "Market must be a two-letter country code, got: {}",
                self.market
            )));
        }

        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Returns a summary of the current configuration for logging.
    ///
    /// Credentials are never included.
    pub fn summary(&self) -> String {
        format!(
            "Config Summary:\n  \
            Spotify: market {}, {}s timeout\n  \
            Themes: {}\n  \
            Cache: {} entries, {}s TTL\n  \
            Limits: {} results by default",
            self.market,
            self.request_timeout,
            self.themes_csv.display(),
            self.cache_capacity,
            self.cache_ttl,
            self.default_limit,
        )
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse()
        .map_err(|e| Error::Configuration(format!("invalid {} '{}': {}", key, raw, e)))
}

/// Default configuration values.
///
/// Credentials have no defaults and must be provided.
impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            market: "FR".to_string(),

            themes_csv: "data/spotify_genres_themes.csv".into(),

            cache_ttl: 300,
            cache_capacity: 1000,

            request_timeout: 5,
            default_limit: 20,
        }
    }
}
