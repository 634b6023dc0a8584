use std::env;
use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_pool_size: u32,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            db_pool_size: parse_or(&lookup, "DB_POOL_SIZE", 10)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        None => {
            log::debug!("{key} not set, using default: {default}");
            Ok(default)
        }
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x")]))
            .expect("valid config");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_pool_size, 10);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[])),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));
    }

    #[test]
    fn malformed_port_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("PORT", "eighty"),
        ]))
        .expect_err("port must be numeric");
        assert!(err.to_string().starts_with("PORT has an invalid value 'eighty'"));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("HOST", "127.0.0.1"),
            ("PORT", "9090"),
            ("DB_POOL_SIZE", "3"),
        ]))
        .expect("valid config");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9090);
        assert_eq!(config.db_pool_size, 3);
    }
}
