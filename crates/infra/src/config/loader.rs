//! Configuration loader
//!
//! Loads cache configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the environment if one exists
//! 2. Attempts to load from environment variables
//! 3. If the required variable is missing, falls back to loading from file.
//!    Any other environment error is returned as is.
//! 4. Probes multiple paths for config files
//! 5. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! Required:
//! - `PREDCACHE_ML_SERVICE_URL`: ML service base URL
//!
//! Optional (defaults apply when unset):
//! - `PREDCACHE_ML_SERVICE_TIMEOUT_MS`, `PREDCACHE_ML_SERVICE_MAX_ATTEMPTS`
//! - `PREDCACHE_RESPONSE_TTL`
//! - `PREDCACHE_QUERY_TTL`, `PREDCACHE_QUERY_MAX_ENTRIES`
//! - `PREDCACHE_PREDICTION_TTL`, `PREDCACHE_PREDICTION_MAX_ENTRIES`,
//!   `PREDCACHE_PREDICTION_THRESHOLD`
//! - `PREDCACHE_PRECOMPUTE_TTL`, `PREDCACHE_PRECOMPUTE_MAX_ENTRIES`
//! - `PREDCACHE_<CACHE>_EVICTION_POLICY` (`fifo` or `least_hit_count`) and
//!   `PREDCACHE_<CACHE>_EVICTION_BATCH_SIZE`, where `<CACHE>` is one of
//!   `RESPONSE`, `QUERY`, `PREDICTION`, `PRECOMPUTE`
//! - `PREDCACHE_JANITOR_INTERVAL`, `PREDCACHE_JANITOR_JITTER`,
//!   `PREDCACHE_JANITOR_ENABLED`
//! - `PREDCACHE_LOG_LEVEL`, `PREDCACHE_LOG_JSON`
//!
//! TTLs and intervals are in seconds.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./predcache.json` or `./predcache.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. `../predcache.json` or `../predcache.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use predcache_domain::{CacheSettings, Config, EvictionPolicySetting, PredCacheError, Result};

use crate::errors::InfraError;

/// The one variable without a default; its absence selects file loading
const ML_SERVICE_URL_VAR: &str = "PREDCACHE_ML_SERVICE_URL";

const CONFIG_FILE_NAMES: [&str; 4] = ["predcache.json", "predcache.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// Loads from environment variables when `PREDCACHE_ML_SERVICE_URL` is set,
/// otherwise from a config file. A malformed environment value is an error,
/// never a reason to fall back.
///
/// # Errors
/// Returns `PredCacheError::Config` if:
/// - An environment variable is set but invalid
/// - No config file is found when the environment is not used
/// - File format is invalid
/// - A value fails validation
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    if std::env::var_os(ML_SERVICE_URL_VAR).is_none() {
        tracing::debug!(var = ML_SERVICE_URL_VAR, "Required variable not set, trying file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from environment variables
///
/// Unset optional variables keep their defaults.
///
/// # Errors
/// Returns `PredCacheError::Config` if the required variable is missing or
/// any value is invalid.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.ml_service.base_url = env_var(ML_SERVICE_URL_VAR)?;
    set_from_env(&mut config.ml_service.timeout_ms, "PREDCACHE_ML_SERVICE_TIMEOUT_MS")?;
    set_from_env(&mut config.ml_service.max_attempts, "PREDCACHE_ML_SERVICE_MAX_ATTEMPTS")?;

    apply_cache_env(&mut config.caches.response, "RESPONSE")?;
    apply_cache_env(&mut config.caches.query, "QUERY")?;
    apply_cache_env(&mut config.caches.prediction, "PREDICTION")?;
    apply_cache_env(&mut config.caches.precompute, "PRECOMPUTE")?;
    if let Some(threshold) = env_parse::<f64>("PREDCACHE_PREDICTION_THRESHOLD")? {
        config.caches.prediction.similarity_threshold = Some(threshold);
    }

    set_from_env(&mut config.janitor.interval_seconds, "PREDCACHE_JANITOR_INTERVAL")?;
    set_from_env(&mut config.janitor.jitter_seconds, "PREDCACHE_JANITOR_JITTER")?;
    config.janitor.enabled = env_bool("PREDCACHE_JANITOR_ENABLED", config.janitor.enabled);

    if let Ok(level) = std::env::var("PREDCACHE_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("PREDCACHE_LOG_JSON", config.logging.json);

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `PredCacheError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - A value fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PredCacheError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            PredCacheError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| PredCacheError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`). Missing
/// sections and fields take their defaults.
///
/// # Errors
/// Returns `PredCacheError::Config` if format is invalid or parsing fails.
pub fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| InfraError::from(e).into()),
        "json" => serde_json::from_str(contents).map_err(|e| InfraError::from(e).into()),
        _ => Err(PredCacheError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its parent, then the directory
/// of the executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn apply_cache_env(settings: &mut CacheSettings, cache: &str) -> Result<()> {
    set_from_env(&mut settings.ttl_seconds, &format!("PREDCACHE_{}_TTL", cache))?;
    if let Some(max) = env_parse::<usize>(&format!("PREDCACHE_{}_MAX_ENTRIES", cache))? {
        settings.max_entries = Some(max);
    }
    if let Some(batch) = env_parse::<usize>(&format!("PREDCACHE_{}_EVICTION_BATCH_SIZE", cache))? {
        settings.eviction_batch_size = Some(batch);
    }
    set_from_env::<EvictionPolicySetting>(
        &mut settings.eviction_policy,
        &format!("PREDCACHE_{}_EVICTION_POLICY", cache),
    )?;
    Ok(())
}

/// Get required environment variable
///
/// # Errors
/// Returns `PredCacheError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        PredCacheError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `PredCacheError::Config` if the variable is set but invalid.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| PredCacheError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

fn set_from_env<T>(target: &mut T, key: &str) -> Result<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(value) = env_parse(key)? {
        *target = value;
    }
    Ok(())
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
