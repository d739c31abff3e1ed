//! Runtime configuration read from the environment.
//!
//! `.env` in the working directory is loaded first (via `dotenvy`); real
//! environment variables win over it.

use std::path::PathBuf;
use std::time::Duration;

/// Default API base URL when `GROVE_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
/// Default request timeout when `GROVE_TIMEOUT_SECS` is unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for the `grove` binary and the live adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the Guardian Grove API, without a trailing slash.
    pub api_url: String,
    /// Bearer token sent with every request.
    pub api_token: Option<String>,
    /// Requester used when `--user` is not given.
    pub user_id: Option<String>,
    /// Upper bound on each remote call.
    pub request_timeout: Duration,
    /// Directory to record per-port cassettes into (`GROVE_RECORD`).
    pub record_dir: Option<PathBuf>,
    /// Cassette to replay instead of calling the API (`GROVE_REPLAY`).
    pub replay_cassette: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            user_id: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            record_dir: None,
            replay_cassette: None,
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error string if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, String> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                return Err(format!("Failed to load .env: {err}"));
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error string if `GROVE_TIMEOUT_SECS` is not a positive integer,
    /// or if recording and replay are both requested.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut config = Self::default();
        if let Some(url) = get("GROVE_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        config.api_token = get("GROVE_API_TOKEN");
        config.user_id = get("GROVE_USER_ID");

        if let Some(raw) = get("GROVE_TIMEOUT_SECS") {
            let secs = raw.parse::<u64>().ok().filter(|secs| *secs > 0).ok_or_else(|| {
                format!("GROVE_TIMEOUT_SECS must be a positive integer, got {raw:?}")
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        config.record_dir = get("GROVE_RECORD").map(PathBuf::from);
        config.replay_cassette = get("GROVE_REPLAY").map(PathBuf::from);
        if config.record_dir.is_some() && config.replay_cassette.is_some() {
            return Err("GROVE_RECORD and GROVE_REPLAY cannot be used together".to_string());
        }

        Ok(config)
    }
}
