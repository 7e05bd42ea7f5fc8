use std::{net::SocketAddr, str::FromStr};

use thiserror::Error;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const BIND_ADDR: &str = "BIND_ADDR";
pub const DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
pub const SESSION_INACTIVITY_MINUTES: &str = "SESSION_INACTIVITY_MINUTES";
pub const SECURE_COOKIES: &str = "SECURE_COOKIES";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}={value:?} is not valid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Server settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub session_inactivity_minutes: i64,
    pub secure_cookies: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://namax.db".to_owned(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            max_connections: 16,
            session_inactivity_minutes: 60,
            secure_cookies: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenv::dotenv().ok();
        Config::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        Ok(Config {
            database_url: lookup(DATABASE_URL).unwrap_or(defaults.database_url),
            bind_addr: parse_or(&lookup, BIND_ADDR, defaults.bind_addr)?,
            max_connections: parse_or(&lookup, DATABASE_MAX_CONNECTIONS, defaults.max_connections)?,
            session_inactivity_minutes: parse_or(&lookup, SESSION_INACTIVITY_MINUTES, defaults.session_inactivity_minutes)?,
            secure_cookies: parse_or(&lookup, SECURE_COOKIES, defaults.secure_cookies)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(key) else {
        return Ok(default);
    };

    let parsed = value.trim().parse::<T>();
    match parsed {
        Ok(parsed) => Ok(parsed),
        Err(err) => Err(ConfigError::Invalid {
            key,
            reason: err.to_string(),
            value,
        }),
    }
}
