use std::time::Duration;

use anyhow::{anyhow, Result};
use log::warn;

/// Database the producer writes endpoint logs into.
pub const DEFAULT_DB_NAME: &str = "FlightTickets";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/**
 * Get an environment variable or a default value
 *
 * # Arguments
 * @param key: &str - The environment variable key
 * @param default: &str - The default value
 *
 * # Returns
 * @return String - The value of the environment variable or the default value
 */
pub fn get_env_var_or_default(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(val) => val,
        Err(_) => {
            warn!("{} not set, using default value: {}", key, default);
            default.to_string()
        }
    }
}

/**
 * Get an environment variable, failing when it is missing or empty
 *
 * # Arguments
 * @param key: &str - The environment variable key
 *
 * # Returns
 * @return Result<String> - The value of the environment variable
 */
pub fn get_env_or_error(key: &str) -> Result<String> {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(anyhow!("Expected a {} in the environment", key)),
    }
}

/**
 * Parse an environment variable, falling back to the default when it is unset or invalid
 *
 * # Arguments
 * @param key: &str - The environment variable key
 * @param default: T - The default value
 *
 * # Returns
 * @return T - The parsed value or the default value
 */
pub fn parse_env_var_or_default<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    let raw = get_env_var_or_default(key, &default.to_string());
    match raw.trim().parse::<T>() {
        Ok(val) => val,
        Err(_) => {
            warn!("{} has invalid value '{}', using default value: {}", key, raw, default);
            default
        }
    }
}

/// Connection settings for the log database.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: String,
    pub db_name: String,
    pub timeout: Duration,
}

impl DbConfig {
    /**
     * Read the database configuration from the environment
     *
     * # Returns
     * @return Result<DbConfig> - The configuration, or an error if DATABASE_URL is missing
     */
    pub fn from_env() -> Result<Self> {
        let database_url = get_env_or_error("DATABASE_URL")?;
        let db_name = get_env_var_or_default("DB_NAME", DEFAULT_DB_NAME);
        let timeout_secs = parse_env_var_or_default("DB_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS);
        Ok(Self {
            database_url,
            db_name,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
