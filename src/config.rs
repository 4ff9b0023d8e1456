use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub generation_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

        let port = parse_or(&lookup, "PORT", 10000)?;
        let timeout_secs: u64 = parse_or(&lookup, "GENERATION_TIMEOUT_SECS", 120)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "GENERATION_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            port,
            gemini_api_key,
            gemini_model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: lookup("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            generation_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
pub fn test_config() -> Config {
    Config {
        port: 0,
        gemini_api_key: "test-key".to_string(),
        gemini_model: DEFAULT_MODEL.to_string(),
        gemini_base_url: "http://127.0.0.1:1".to_string(),
        generation_timeout: Duration::from_secs(5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_only_key_set() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "abc")])).unwrap();
        assert_eq!(config.port, 10000);
        assert_eq!(config.gemini_api_key, "abc");
        assert_eq!(config.gemini_model, DEFAULT_MODEL);
        assert_eq!(config.gemini_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.generation_timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "8080")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("GEMINI_API_KEY")));
        assert_eq!(err.to_string(), "GEMINI_API_KEY must be set");
    }

    #[test]
    fn test_blank_key_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "abc"),
            ("PORT", "8080"),
            ("GEMINI_MODEL", "imagen-test"),
            ("GEMINI_BASE_URL", "http://localhost:9999"),
            ("GENERATION_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.gemini_model, "imagen-test");
        assert_eq!(config.gemini_base_url, "http://localhost:9999");
        assert_eq!(config.generation_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "abc"),
            ("GENERATION_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        match err {
            ConfigError::Invalid { name, value } => {
                assert_eq!(name, "GENERATION_TIMEOUT_SECS");
                assert_eq!(value, "0");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "abc"),
            ("PORT", "not-a-port"),
        ]))
        .unwrap_err();
        match err {
            ConfigError::Invalid { name, value } => {
                assert_eq!(name, "PORT");
                assert_eq!(value, "not-a-port");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
