//! Console configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:4000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

const SESSION_DIR_NAME: &str = "mechanic-admin";
const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid ADMIN_API_URL '{0}' (expected http:// or https://)")]
    InvalidApiUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Backend base URL without a trailing slash.
    pub api_url: String,
    /// Persisted session file; `None` keeps the session in memory only.
    pub session_file: Option<PathBuf>,
    pub timeouts: Timeouts,
    pub page_limit: u32,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            session_file: default_session_file(),
            timeouts: Timeouts::default(),
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl ConsoleConfig {
    /// Build typed console config from environment variables.
    ///
    /// Optional:
    /// - `ADMIN_API_URL`: default `http://localhost:4000`
    /// - `ADMIN_SESSION_FILE`: default `<config dir>/mechanic-admin/session.json`
    /// - `ADMIN_REQUEST_TIMEOUT_SECS`: default 30
    /// - `ADMIN_CONNECT_TIMEOUT_SECS`: default 10
    /// - `ADMIN_PAGE_LIMIT`: default 20
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiUrl`] for a non-http(s) base URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`], reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiUrl`] for a non-http(s) base URL.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = normalize_api_url(lookup("ADMIN_API_URL").as_deref().unwrap_or(DEFAULT_API_URL))?;

        let session_file = lookup("ADMIN_SESSION_FILE")
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from)
            .or_else(default_session_file);

        let timeouts = Timeouts {
            request_secs: parse_or(&lookup, "ADMIN_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_or(&lookup, "ADMIN_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let page_limit = parse_or(&lookup, "ADMIN_PAGE_LIMIT", DEFAULT_PAGE_LIMIT).max(1);

        Ok(Self { api_url, session_file, timeouts, page_limit })
    }
}

/// Trim, require an http(s) scheme, drop trailing slashes.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidApiUrl`] when the scheme is missing or the
/// host part is empty.
pub fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let host = trimmed.strip_prefix("https://").or_else(|| trimmed.strip_prefix("http://"));
    match host {
        Some(rest) if !rest.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(ConfigError::InvalidApiUrl(raw.to_owned())),
    }
}

fn default_session_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SESSION_DIR_NAME).join(SESSION_FILE_NAME))
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    lookup(key).and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}
