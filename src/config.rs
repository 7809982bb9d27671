//! Runtime configuration from environment variables.

use crate::error::ConfigError;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/sandwich_shop";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_SCHEMA: &str = "public";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub schema: String,
}

impl AppConfig {
    /// Reads `DATABASE_URL`, `BIND_ADDR`, `DB_MAX_CONNECTIONS` and `DB_SCHEMA`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());

        let bind = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind.parse().map_err(|_| ConfigError::Invalid {
            var: "BIND_ADDR",
            value: bind.clone(),
        })?;

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(v) => match v.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::Invalid { var: "DB_MAX_CONNECTIONS", value: v }),
            },
        };

        let schema = lookup("DB_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.into());
        if !is_plain_identifier(&schema) {
            return Err(ConfigError::Invalid { var: "DB_SCHEMA", value: schema });
        }

        Ok(AppConfig {
            database_url,
            bind_addr,
            max_connections,
            schema,
        })
    }
}

/// Lowercase letters, digits and underscores, not starting with a digit.
pub fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    s.len() <= 63 && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
