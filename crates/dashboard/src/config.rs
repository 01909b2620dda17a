//! Runtime configuration.
//!
//! Desktop reads the environment (after loading `.env`); the browser build
//! bakes values in at compile time.

use std::time::Duration;

use thiserror::Error;
use url::Url;

use quizdash_shared::{ENGINE_IO_VERSION, SOCKET_IO_PATH};

use crate::infrastructure::http_client::DEFAULT_API_URL;
use crate::infrastructure::websocket::ReconnectPolicy;

/// Default lifetime of a stored admin session
pub const DEFAULT_SESSION_TTL_SECS: i64 = 12 * 60 * 60;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid API URL {url:?}: {reason}")]
    InvalidApiUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Base URL of the game server REST API (also hosts the push endpoint)
    pub api_url: String,
    pub session_ttl_secs: i64,
    pub request_timeout: Duration,
    pub reconnect: ReconnectPolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl DashboardConfig {
    /// Load from `QUIZDASH_*` variables, falling back to defaults.
    ///
    /// Unparsable numbers are logged and replaced by their default.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Values baked in when the browser bundle was built
    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| {
            match key {
                "QUIZDASH_API_URL" => option_env!("QUIZDASH_API_URL"),
                "QUIZDASH_SESSION_TTL_SECS" => option_env!("QUIZDASH_SESSION_TTL_SECS"),
                "QUIZDASH_REQUEST_TIMEOUT_SECS" => option_env!("QUIZDASH_REQUEST_TIMEOUT_SECS"),
                _ => None,
            }
            .map(str::to_string)
        })
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_url = lookup("QUIZDASH_API_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_url);

        let session_ttl_secs = parse_or("QUIZDASH_SESSION_TTL_SECS", &lookup, defaults.session_ttl_secs)
            .max(1);
        let timeout_secs = parse_or(
            "QUIZDASH_REQUEST_TIMEOUT_SECS",
            &lookup,
            DEFAULT_REQUEST_TIMEOUT_SECS,
        );

        Self {
            api_url,
            session_ttl_secs,
            request_timeout: Duration::from_secs(timeout_secs),
            reconnect: defaults.reconnect,
        }
    }

    /// Socket.IO WebSocket endpoint derived from the API URL.
    ///
    /// `http` becomes `ws`, `https` becomes `wss`; the path is replaced by
    /// the Socket.IO endpoint.
    pub fn push_endpoint(&self) -> Result<String, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidApiUrl {
            url: self.api_url.clone(),
            reason,
        };

        let mut url = Url::parse(&self.api_url).map_err(|e| invalid(e.to_string()))?;
        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => return Err(invalid(format!("unsupported scheme {}", other))),
        };
        url.set_scheme(scheme)
            .map_err(|_| invalid(format!("cannot switch to {}", scheme)))?;
        url.set_path(SOCKET_IO_PATH);
        url.set_query(Some(&format!(
            "EIO={}&transport=websocket",
            ENGINE_IO_VERSION
        )));
        url.set_fragment(None);
        Ok(url.to_string())
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, value = %raw, "Ignoring unparsable setting");
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> DashboardConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DashboardConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]);
        assert_eq!(config.api_url, "http://localhost:3000");
        assert_eq!(config.session_ttl_secs, DEFAULT_SESSION_TTL_SECS);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.reconnect, ReconnectPolicy::default());
    }

    #[test]
    fn reads_overrides_and_ignores_garbage() {
        let config = config_from(&[
            ("QUIZDASH_API_URL", "https://quiz.example.com"),
            ("QUIZDASH_SESSION_TTL_SECS", "600"),
            ("QUIZDASH_REQUEST_TIMEOUT_SECS", "soon"),
        ]);
        assert_eq!(config.api_url, "https://quiz.example.com");
        assert_eq!(config.session_ttl_secs, 600);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn push_endpoint_switches_scheme() {
        let config = config_from(&[]);
        assert_eq!(
            config.push_endpoint().unwrap(),
            "ws://localhost:3000/socket.io/?EIO=4&transport=websocket"
        );

        let secure = config_from(&[("QUIZDASH_API_URL", "https://quiz.example.com/api")]);
        assert_eq!(
            secure.push_endpoint().unwrap(),
            "wss://quiz.example.com/socket.io/?EIO=4&transport=websocket"
        );
    }

    #[test]
    fn push_endpoint_rejects_bad_urls() {
        let config = config_from(&[("QUIZDASH_API_URL", "not a url")]);
        assert!(config.push_endpoint().is_err());

        let ftp = config_from(&[("QUIZDASH_API_URL", "ftp://example.com")]);
        assert!(matches!(
            ftp.push_endpoint(),
            Err(ConfigError::InvalidApiUrl { .. })
        ));
    }
}
