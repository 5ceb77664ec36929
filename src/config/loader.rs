//! Load `AppConfig` from environment variables (after `.env`, if present).

use crate::config::types::{AppConfig, StoreKind};
use crate::error::ConfigError;
use std::str::FromStr;

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = AppConfig::default();
        if let Some(url) = lookup("DATABASE_URL") {
            cfg.database_url = url;
        }
        if let Some(v) = lookup("CAMP_STORE") {
            cfg.store = StoreKind::from_str(&v).map_err(|value| ConfigError::Invalid {
                key: "CAMP_STORE",
                value,
            })?;
        }
        if let Some(v) = lookup("BIND_ADDR") {
            cfg.bind_addr = parse("BIND_ADDR", &v)?;
        }
        if let Some(v) = lookup("DB_MAX_CONNECTIONS") {
            cfg.max_connections = parse("DB_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("SEED_SAMPLE_DATA") {
            cfg.seed_sample_data = parse_bool("SEED_SAMPLE_DATA", &v)?;
        }
        if let Some(v) = lookup("BODY_LIMIT_BYTES") {
            cfg.body_limit_bytes = parse("BODY_LIMIT_BYTES", &v)?;
        }
        if let Some(v) = lookup("BASE_PATH") {
            cfg.base_path = v;
        }
        Ok(cfg)
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}
