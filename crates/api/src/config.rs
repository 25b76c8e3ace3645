use std::str::FromStr;

use axum::http::HeaderValue;

use crate::auth::jwt::{SessionConfig, DEFAULT_SESSION_MAX_AGE_SECS};
use crate::auth::password::PasswordConfig;

/// Reasons the environment cannot produce a usable [`ServerConfig`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// Everything except the signing secret has a default suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Session token secret, lifetime and cookie flags.
    pub session: SessionConfig,
    /// Work factor for new password hashes.
    pub password: PasswordConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `AUTH_SECRET`               | **required**            |
    /// | `SESSION_MAX_AGE_SECS`      | `2592000` (30 days)     |
    /// | `SESSION_COOKIE_SECURE`     | `false`                 |
    /// | `PASSWORD_HASH_MEMORY_KIB`  | `19456`                 |
    /// | `PASSWORD_HASH_ITERATIONS`  | `2`                     |
    /// | `PASSWORD_HASH_PARALLELISM` | `1`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&lookup, "PORT", 3000u16)?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if let Some(bad) = cors_origins
            .iter()
            .find(|o| o.parse::<HeaderValue>().is_err())
        {
            return Err(ConfigError::Invalid {
                key: "CORS_ORIGINS",
                value: bad.clone(),
            });
        }

        let request_timeout_secs = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30u64)?;

        let secret = lookup("AUTH_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("AUTH_SECRET"))?;
        let max_age_secs = parse_or(&lookup, "SESSION_MAX_AGE_SECS", DEFAULT_SESSION_MAX_AGE_SECS)?;
        if max_age_secs <= 0 {
            return Err(ConfigError::Invalid {
                key: "SESSION_MAX_AGE_SECS",
                value: max_age_secs.to_string(),
            });
        }
        let cookie_secure = parse_or(&lookup, "SESSION_COOKIE_SECURE", false)?;

        let defaults = PasswordConfig::default();
        let password = PasswordConfig {
            memory_kib: parse_or(&lookup, "PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&lookup, "PASSWORD_HASH_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&lookup, "PASSWORD_HASH_PARALLELISM", defaults.parallelism)?,
        };
        if password.hasher().is_err() {
            return Err(ConfigError::Invalid {
                key: "PASSWORD_HASH_*",
                value: format!(
                    "m={},t={},p={}",
                    password.memory_kib, password.iterations, password.parallelism
                ),
            });
        }

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            session: SessionConfig {
                secret,
                max_age_secs,
                cookie_secure,
            },
            password,
        })
    }

    /// `host:port` string for the TCP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().parse() {
        Ok(value) => Ok(value),
        Err(_) => Err(ConfigError::Invalid { key, value: raw }),
    }
}
