// src/config.rs

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

use crate::messages::whatsapp::DEFAULT_WHATSAPP_BASE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_path: String,
    pub schema_path: String,
    pub max_workers: usize,
    pub otp_ttl_secs: i64,
    pub default_country_code: String,
    pub whatsapp_base_url: String,
    /// Cloud API endpoint for outbound messages. OTPs are only logged when unset.
    pub whatsapp_api_url: Option<String>,
    pub whatsapp_api_token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database_path: "booking_desk.sqlite3".to_string(),
            schema_path: "sql/schema.sql".to_string(),
            max_workers: 8,
            otp_ttl_secs: 5 * 60,
            default_country_code: "91".to_string(),
            whatsapp_base_url: DEFAULT_WHATSAPP_BASE.to_string(),
            whatsapp_api_url: None,
            whatsapp_api_token: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is normal outside development.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            bind_addr: parse_or(&lookup, "BIND_ADDR", defaults.bind_addr)?,
            database_path: get("DATABASE_PATH").unwrap_or(defaults.database_path),
            schema_path: get("SCHEMA_PATH").unwrap_or(defaults.schema_path),
            max_workers: parse_or(&lookup, "MAX_WORKERS", defaults.max_workers)?,
            otp_ttl_secs: parse_or(&lookup, "OTP_TTL_SECS", defaults.otp_ttl_secs)?,
            default_country_code: get("DEFAULT_COUNTRY_CODE")
                .unwrap_or(defaults.default_country_code),
            whatsapp_base_url: get("WHATSAPP_BASE_URL").unwrap_or(defaults.whatsapp_base_url),
            whatsapp_api_url: get("WHATSAPP_API_URL"),
            whatsapp_api_token: get("WHATSAPP_API_TOKEN"),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        _ => Ok(default),
    }
}
