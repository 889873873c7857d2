use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::app_config::AppConfig;
use crate::keywords::{
    TrendsConfig, BEAUTY_FITNESS_CATEGORY_ID, BEAUTY_KEYWORDS, DEFAULT_REGION, DEFAULT_TIMEFRAME,
    MAX_BATCH_SIZE,
};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; unset variables take the production defaults.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let region = or_default("REGION", DEFAULT_REGION);
    let keywords = match lookup("ARUMA_KEYWORDS") {
        Ok(raw) => parse_keywords(&raw)?,
        Err(_) => BEAUTY_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
    };
    let category_id: u32 = parse_num(
        "ARUMA_CATEGORY_ID",
        &or_default("ARUMA_CATEGORY_ID", &BEAUTY_FITNESS_CATEGORY_ID.to_string()),
    )?;
    let timeframe = or_default("ARUMA_TIMEFRAME", DEFAULT_TIMEFRAME);
    let batch_size = parse_batch_size(&or_default(
        "ARUMA_BATCH_SIZE",
        &MAX_BATCH_SIZE.to_string(),
    ))?;
    let inter_batch_delay_secs: u64 = parse_num(
        "ARUMA_INTER_BATCH_DELAY_SECS",
        &or_default("ARUMA_INTER_BATCH_DELAY_SECS", "3"),
    )?;

    let data_dir = PathBuf::from(or_default("ARUMA_DATA_DIR", "data/trends"));
    let log_level = or_default("ARUMA_LOG_LEVEL", "info");
    let host_language = or_default("ARUMA_HOST_LANGUAGE", "es-PE");
    let tz_offset_minutes: i32 =
        parse_num("ARUMA_TZ_OFFSET", &or_default("ARUMA_TZ_OFFSET", "-300"))?;
    let request_timeout_secs: u64 = parse_num(
        "ARUMA_REQUEST_TIMEOUT_SECS",
        &or_default("ARUMA_REQUEST_TIMEOUT_SECS", "25"),
    )?;
    let connect_timeout_secs: u64 = parse_num(
        "ARUMA_CONNECT_TIMEOUT_SECS",
        &or_default("ARUMA_CONNECT_TIMEOUT_SECS", "10"),
    )?;
    let user_agent = or_default("ARUMA_USER_AGENT", DEFAULT_USER_AGENT);
    let max_retries: u32 =
        parse_num("ARUMA_MAX_RETRIES", &or_default("ARUMA_MAX_RETRIES", "3"))?;
    let retry_backoff_base_ms: u64 = parse_num(
        "ARUMA_RETRY_BACKOFF_BASE_MS",
        &or_default("ARUMA_RETRY_BACKOFF_BASE_MS", "300"),
    )?;

    Ok(AppConfig {
        trends: TrendsConfig {
            region,
            keywords,
            category_id,
            timeframe,
            batch_size,
            inter_batch_delay: Duration::from_secs(inter_batch_delay_secs),
        },
        data_dir,
        log_level,
        host_language,
        tz_offset_minutes,
        request_timeout_secs,
        connect_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
    })
}

/// Parse a numeric variable, naming the variable in the error.
fn parse_num<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

/// Split a comma-separated keyword list, trimming whitespace and dropping
/// empty items.
fn parse_keywords(raw: &str) -> Result<Vec<String>, ConfigError> {
    let keywords: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();

    if keywords.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "ARUMA_KEYWORDS".to_string(),
            reason: "keyword list is empty".to_string(),
        });
    }
    Ok(keywords)
}

/// Parse the batch size, rejecting values outside `1..=MAX_BATCH_SIZE`.
fn parse_batch_size(raw: &str) -> Result<usize, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "ARUMA_BATCH_SIZE".to_string(),
        reason,
    };
    let size = raw.parse::<usize>().map_err(|e| invalid(e.to_string()))?;
    if size == 0 || size > MAX_BATCH_SIZE {
        return Err(invalid(format!(
            "must be between 1 and {MAX_BATCH_SIZE}, got {size}"
        )));
    }
    Ok(size)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
