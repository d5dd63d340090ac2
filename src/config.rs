//! Environment-sourced configuration for the analytics tools

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An environment override could not be parsed
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Connection and tooling configuration, built once at startup.
///
/// Every field has a documented default and can be overridden through the
/// environment. Bad numeric overrides fail here, before any query is issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database host (`PGHOST`)
    pub host: String,
    /// Database port (`PGPORT`)
    pub port: u16,
    /// Database name (`PGDATABASE`)
    pub database: String,
    /// Database user (`PGUSER`)
    pub user: String,
    /// Database password (`PGPASSWORD`)
    pub password: String,
    /// Embedding dimensionality (`EMB_DIM`)
    pub embedding_dim: usize,
    /// Number of synthetic embedding rows to insert (`NUM_INSERTS`)
    pub num_inserts: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "care_analytics_dev".to_string(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            embedding_dim: 1536,
            num_inserts: 200,
        }
    }
}

impl Config {
    /// Build the configuration from the environment, validating eagerly
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();
        Ok(Config {
            host: string_env("PGHOST", defaults.host),
            port: parse_env("PGPORT", defaults.port)?,
            database: string_env("PGDATABASE", defaults.database),
            user: string_env("PGUSER", defaults.user),
            password: string_env("PGPASSWORD", defaults.password),
            embedding_dim: parse_env("EMB_DIM", defaults.embedding_dim)?,
            num_inserts: parse_env("NUM_INSERTS", defaults.num_inserts)?,
        })
    }

    /// Render a libpq-style connection string for `tokio_postgres::connect`
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            self.host, self.port, self.database, self.user, self.password
        )
    }
}

fn string_env(key: &str, default: String) -> String {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default,
    }
}

fn parse_env<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

/// Parse a single override, reporting the offending key and value on failure
fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
