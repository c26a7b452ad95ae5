use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

/// Service settings, read from the environment (after `.env`, if present)
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub nats_url: Option<String>,
    pub upload_dir: PathBuf,
    pub currency: String,
    /// Configurator sessions untouched this long are dropped
    pub session_idle_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8083,
            database_url: None,
            database_max_connections: 10,
            nats_url: None,
            upload_dir: PathBuf::from("uploads"),
            currency: "USD".to_string(),
            session_idle_minutes: 120,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            port: try_load("PORT", defaults.port)?,
            database_url: optional("DATABASE_URL"),
            database_max_connections: try_load("DATABASE_MAX_CONNECTIONS", defaults.database_max_connections)?,
            nats_url: optional("NATS_URL"),
            upload_dir: optional("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.upload_dir),
            currency: optional("CURRENCY").map(|c| c.to_uppercase()).unwrap_or(defaults.currency),
            session_idle_minutes: try_load("SESSION_IDLE_MINUTES", defaults.session_idle_minutes)?,
        })
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn try_load<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match optional(key) {
        Some(raw) => raw.parse().map_err(|e| {
            warn!("Invalid {key} value: {e}");
            anyhow::anyhow!("invalid {key}: {e}")
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_load_parses_and_rejects() {
        env::set_var("TAILOR_TEST_PORT_OK", " 9090 ");
        env::set_var("TAILOR_TEST_PORT_BAD", "ninety");
        assert_eq!(try_load("TAILOR_TEST_PORT_OK", 1u16).unwrap(), 9090);
        assert!(try_load("TAILOR_TEST_PORT_BAD", 1u16).is_err());
        assert_eq!(try_load("TAILOR_TEST_PORT_UNSET", 7u16).unwrap(), 7);
    }
}
