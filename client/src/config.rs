//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub const SOCKET_URI_VAR: &str = "SUMMARIZE_SOCKET_URI";
pub const API_URI_VAR: &str = "SUMMARIZE_API_URI";
pub const REQUEST_TIMEOUT_VAR: &str = "SUMMARIZE_REQUEST_TIMEOUT_SECS";
pub const CONNECT_TIMEOUT_VAR: &str = "SUMMARIZE_CONNECT_TIMEOUT_SECS";

const SOCKET_SCHEMES: &[&str] = &["http://", "https://", "ws://", "wss://"];
const API_SCHEMES: &[&str] = &["http://", "https://"];

/// Errors produced while building a [`ClientConfig`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A base URL does not use a scheme its transport supports.
    #[error("invalid base URL for {var}: {value}")]
    InvalidBaseUrl { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the streaming socket endpoint.
    pub socket_url: String,
    /// Base URL of the HTTP API.
    pub api_url: String,
    pub timeouts: Timeouts,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            socket_url: DEFAULT_BASE_URL.to_owned(),
            api_url: DEFAULT_BASE_URL.to_owned(),
            timeouts: Timeouts::default(),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `SUMMARIZE_SOCKET_URI`: default `http://127.0.0.1:3000`
    /// - `SUMMARIZE_API_URI`: default `http://127.0.0.1:3000`
    /// - `SUMMARIZE_REQUEST_TIMEOUT_SECS`: default 120
    /// - `SUMMARIZE_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when the socket URL is not
    /// http(s) or ws(s), or the API URL is not http(s).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_parts(
            std::env::var(SOCKET_URI_VAR).ok(),
            std::env::var(API_URI_VAR).ok(),
            Timeouts {
                request_secs: env_parse_u64(REQUEST_TIMEOUT_VAR, DEFAULT_REQUEST_TIMEOUT_SECS),
                connect_secs: env_parse_u64(CONNECT_TIMEOUT_VAR, DEFAULT_CONNECT_TIMEOUT_SECS),
            },
        )
    }

    /// Build config from explicit values, falling back to defaults for
    /// missing URLs.
    ///
    /// # Errors
    ///
    /// Same rules as [`ClientConfig::from_env`].
    pub fn from_parts(
        socket_url: Option<String>,
        api_url: Option<String>,
        timeouts: Timeouts,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            socket_url: normalize_base_url(SOCKET_URI_VAR, socket_url, SOCKET_SCHEMES)?,
            api_url: normalize_base_url(API_URI_VAR, api_url, API_SCHEMES)?,
            timeouts,
        })
    }
}

fn normalize_base_url(
    var: &'static str,
    raw: Option<String>,
    schemes: &[&str],
) -> Result<String, ConfigError> {
    let value = raw
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
    let supported = schemes.iter().any(|scheme| value.starts_with(scheme));
    if !supported {
        return Err(ConfigError::InvalidBaseUrl { var, value });
    }
    Ok(value.trim_end_matches('/').to_owned())
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
