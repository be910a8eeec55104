//! Configuration management for the monthly playlist generator.
//!
//! This module handles loading and accessing configuration values from
//! environment variables, `.env` files and command-line flags.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables, when set and non-empty (highest priority)
//! 2. `.env` file in the local data directory (loaded into the environment)
//! 3. Command-line flags
//! 4. Application defaults (where applicable)

use std::{
    env,
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use crate::error::{Error, Result};

pub const ENV_TARGET_MONTH: &str = "PLGEN_TARGET_MONTH";
pub const ENV_USERNAME: &str = "PLGEN_LB_USERNAME";
pub const ENV_TIMEZONE: &str = "PLGEN_TIMEZONE";
pub const ENV_API_URL: &str = "PLGEN_LB_API_URL";
pub const ENV_REQUEST_DELAY_MS: &str = "PLGEN_REQUEST_DELAY_MS";
pub const ENV_VERBOSE: &str = "PLGEN_VERBOSE";

pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_API_URL: &str = "https://api.listenbrainz.org";
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(1);

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file is looked up under `monthplgen/.env` in the platform-specific
/// local data directory:
/// - Linux: `~/.local/share/monthplgen/.env`
/// - macOS: `~/Library/Application Support/monthplgen/.env`
/// - Windows: `%LOCALAPPDATA%/monthplgen/.env`
///
/// A missing file is not an error, everything can also come from flags.
/// Variables already present in the process environment are not overridden.
///
/// # Errors
///
/// Returns [`Error::Io`] if the parent directory cannot be created and
/// [`Error::Config`] if the file exists but cannot be parsed.
pub async fn load_env() -> Result<()> {
    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map_err(|e| Error::config(format!("cannot load {}: {}", path.display(), e)))
}

fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("monthplgen/.env");
    path
}

/// Chooses between an environment value and a flag value.
///
/// The environment wins when it is set and non-empty, otherwise the flag is
/// used. Empty flag values count as unset too.
///
/// # Example
///
/// ```
/// assert_eq!(pick(Some("env".into()), Some("flag".into())).as_deref(), Some("env"));
/// assert_eq!(pick(Some("".into()), Some("flag".into())).as_deref(), Some("flag"));
/// ```
pub fn pick(env_value: Option<String>, flag: Option<String>) -> Option<String> {
    env_value
        .filter(|v| !v.is_empty())
        .or_else(|| flag.filter(|v| !v.is_empty()))
}

fn resolve(key: &str, flag: Option<String>) -> Option<String> {
    pick(env::var(key).ok(), flag)
}

/// Returns the requested target month label, if any.
///
/// Reads `PLGEN_TARGET_MONTH`, falling back to the `--month` flag. `None`
/// means the caller should use the current month.
pub fn target_month(flag: Option<String>) -> Option<String> {
    resolve(ENV_TARGET_MONTH, flag)
}

/// Returns the ListenBrainz username whose listens are collected.
///
/// # Errors
///
/// Returns [`Error::MissingUsername`] when neither `PLGEN_LB_USERNAME` nor
/// `--user` provides a value.
pub fn username(flag: Option<String>) -> Result<String> {
    resolve(ENV_USERNAME, flag).ok_or(Error::MissingUsername)
}

/// Returns the timezone name used to anchor the month boundaries.
///
/// Reads `PLGEN_TIMEZONE`, then `--timezone`, then defaults to `UTC`.
pub fn timezone(flag: Option<String>) -> String {
    resolve(ENV_TIMEZONE, flag).unwrap_or_else(|| DEFAULT_TIMEZONE.to_string())
}

/// Returns the ListenBrainz API base URL without a trailing slash.
///
/// Reads `PLGEN_LB_API_URL`, then `--api-url`, then defaults to
/// `https://api.listenbrainz.org`.
pub fn api_url(flag: Option<String>) -> String {
    resolve(ENV_API_URL, flag)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Returns the pause applied before every listens request.
///
/// Reads `PLGEN_REQUEST_DELAY_MS`, then `--delay-ms`, then defaults to one
/// second.
///
/// # Errors
///
/// Returns [`Error::Config`] when the value is not a whole number of
/// milliseconds.
pub fn request_delay(flag: Option<u64>) -> Result<Duration> {
    match resolve(ENV_REQUEST_DELAY_MS, flag.map(|ms| ms.to_string())) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| Error::config(format!("invalid request delay '{}': {}", raw, e))),
        None => Ok(DEFAULT_REQUEST_DELAY),
    }
}

/// Whether `PLGEN_VERBOSE` asks for diagnostic output.
///
/// Any non-empty value other than `0` or `false` enables it.
pub fn verbose_from_env() -> bool {
    env::var(ENV_VERBOSE)
        .map(|v| !v.is_empty() && v != "0" && !v.eq_ignore_ascii_case("false"))
        .unwrap_or(false)
}

/// Switches the [`debug!`](crate::debug) macro on or off for the process.
pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}
