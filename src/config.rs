//! Runtime configuration from the environment.
//! Defaults target a locally running API.

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/";
pub const DEFAULT_CACHE_PATH: &str = "buut.db";
pub const DEFAULT_SESSION_FILE: &str = "session.json";
pub const DEFAULT_SYNC_SECS: u64 = 900;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECTIVITY_TIMEOUT_MS: u64 = 1_500;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("{0} is set but {1} is missing")]
    Incomplete(&'static str, &'static str),
}

/// Auth0 tenant used for password login and token refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auth0Config {
    pub domain: String,
    pub client_id: String,
    pub audience: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    /// SQLite file holding the local mirror.
    pub cache_path: String,
    pub session_file: String,
    /// `None` disables login and token refresh.
    pub auth0: Option<Auth0Config>,
    pub booking_sync_interval: Duration,
    pub notification_sync_interval: Duration,
    /// Allow running one-shot commands without the periodic loops.
    pub sync_enabled: bool,
    pub http_timeout: Duration,
    pub connectivity_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let auth0 = match (get("AUTH0_DOMAIN"), get("AUTH0_CLIENT_ID")) {
            (Some(domain), Some(client_id)) => Some(Auth0Config {
                domain,
                client_id,
                audience: get("AUTH0_AUDIENCE"),
            }),
            (Some(_), None) => return Err(ConfigError::Incomplete("AUTH0_DOMAIN", "AUTH0_CLIENT_ID")),
            (None, Some(_)) => return Err(ConfigError::Incomplete("AUTH0_CLIENT_ID", "AUTH0_DOMAIN")),
            (None, None) => None,
        };

        let secs = |name: &'static str, default: u64| -> Result<u64, ConfigError> {
            match get(name) {
                None => Ok(default),
                Some(v) => match v.parse::<u64>() {
                    Ok(n) if n > 0 => Ok(n),
                    _ => Err(ConfigError::Invalid {
                        name,
                        value: v,
                        expected: "a positive integer",
                    }),
                },
            }
        };

        let sync_enabled = match get("SYNC_ENABLED") {
            None => true,
            Some(v) => match v.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "SYNC_ENABLED",
                        value: v,
                        expected: "true or false",
                    });
                }
            },
        };

        Ok(Config {
            api_url: get("BUUT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            cache_path: get("BUUT_CACHE_PATH").unwrap_or_else(|| DEFAULT_CACHE_PATH.to_string()),
            session_file: get("BUUT_SESSION_FILE").unwrap_or_else(|| DEFAULT_SESSION_FILE.to_string()),
            auth0,
            booking_sync_interval: Duration::from_secs(secs("BOOKING_SYNC_INTERVAL_SECS", DEFAULT_SYNC_SECS)?),
            notification_sync_interval: Duration::from_secs(secs(
                "NOTIFICATION_SYNC_INTERVAL_SECS",
                DEFAULT_SYNC_SECS,
            )?),
            sync_enabled,
            http_timeout: Duration::from_secs(secs("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?),
            connectivity_timeout: Duration::from_millis(secs(
                "CONNECTIVITY_TIMEOUT_MS",
                DEFAULT_CONNECTIVITY_TIMEOUT_MS,
            )?),
        })
    }
}
