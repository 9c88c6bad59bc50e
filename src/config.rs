// src/config.rs
use std::str::FromStr;
use std::time::Duration;

use crate::errors::ConfigError;
use crate::upstream::RetryPolicy;

pub const DEFAULT_DOG_API_URL: &str = "https://dog.ceo/api/breeds/image/random";
pub const DEFAULT_PORT: u16 = 3001;

/// Settings for talking to the upstream dog API.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub url: String,
    pub retry: RetryPolicy,
    /// Reject payloads whose `status` is not `"success"`.
    pub require_success_status: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DOG_API_URL.to_string(),
            retry: RetryPolicy::default(),
            require_success_status: true,
        }
    }
}

/// High-level application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub upstream: UpstreamConfig,
    pub cors_permissive: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            upstream: UpstreamConfig::default(),
            cors_permissive: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        let url = lookup("DOG_API_URL").unwrap_or(defaults.upstream.url);
        if let Err(e) = reqwest::Url::parse(&url) {
            return Err(ConfigError::InvalidValue {
                key: "DOG_API_URL",
                value: url,
                reason: e.to_string(),
            });
        }

        let max_attempts: u32 = parse_or(&lookup, "UPSTREAM_MAX_ATTEMPTS", defaults.upstream.retry.max_attempts)?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "UPSTREAM_MAX_ATTEMPTS",
                value: "0".to_string(),
                reason: "at least one attempt is required".to_string(),
            });
        }

        let timeout_ms: u64 = parse_or(
            &lookup,
            "UPSTREAM_TIMEOUT_MS",
            defaults.upstream.retry.timeout.as_millis() as u64,
        )?;
        let retry_delay_ms: u64 = parse_or(
            &lookup,
            "UPSTREAM_RETRY_DELAY_MS",
            defaults.upstream.retry.retry_delay.as_millis() as u64,
        )?;

        Ok(AppConfig {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            upstream: UpstreamConfig {
                url,
                retry: RetryPolicy {
                    max_attempts,
                    timeout: Duration::from_millis(timeout_ms),
                    retry_delay: Duration::from_millis(retry_delay_ms),
                },
                require_success_status: parse_bool_or(
                    &lookup,
                    "REQUIRE_SUCCESS_STATUS",
                    defaults.upstream.require_success_status,
                )?,
            },
            cors_permissive: parse_bool_or(&lookup, "CORS_PERMISSIVE", defaults.cors_permissive)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

fn parse_bool_or<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key,
                value: raw,
                reason: "expected a boolean".to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config.port, 3001);
        assert_eq!(config.upstream.url, DEFAULT_DOG_API_URL);
        assert_eq!(config.upstream.retry.max_attempts, 2);
        assert_eq!(config.upstream.retry.timeout, Duration::from_millis(2000));
        assert_eq!(config.upstream.retry.retry_delay, Duration::from_millis(200));
        assert!(config.upstream.require_success_status);
        assert!(!config.cors_permissive);
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("DOG_API_URL", "http://127.0.0.1:9000/random"),
            ("UPSTREAM_MAX_ATTEMPTS", "3"),
            ("UPSTREAM_TIMEOUT_MS", "500"),
            ("REQUIRE_SUCCESS_STATUS", "false"),
            ("CORS_PERMISSIVE", "yes"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.upstream.url, "http://127.0.0.1:9000/random");
        assert_eq!(config.upstream.retry.max_attempts, 3);
        assert_eq!(config.upstream.retry.timeout, Duration::from_millis(500));
        assert!(!config.upstream.require_success_status);
        assert!(config.cors_permissive);
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let err = AppConfig::from_lookup(lookup_from(&[("UPSTREAM_MAX_ATTEMPTS", "0")])).unwrap_err();
        assert!(err.to_string().contains("UPSTREAM_MAX_ATTEMPTS"));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("DOG_API_URL", "dog.ceo")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("CORS_PERMISSIVE", "maybe")])).is_err());
    }
}
