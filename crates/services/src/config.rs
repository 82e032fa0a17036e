use std::env;
use std::time::Duration;

use url::Url;

use crate::error::{ApiError, ConfigError};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const API_URL_VAR: &str = "INTELLITEST_API_URL";
pub const POLL_SECS_VAR: &str = "INTELLITEST_POLL_SECS";
pub const TIMEOUT_SECS_VAR: &str = "INTELLITEST_TIMEOUT_SECS";

/// Where the REST API lives and how the client paces itself against it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: Url,
    timeout: Duration,
    poll_interval: Duration,
}

impl ApiConfig {
    /// Build a config for the given server root (e.g. `http://localhost:8000`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL does not parse or is not http(s).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Read `INTELLITEST_API_URL`, `INTELLITEST_POLL_SECS` and `INTELLITEST_TIMEOUT_SECS`,
    /// falling back to defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var(API_URL_VAR).unwrap_or_else(|_| DEFAULT_API_URL.into());
        let mut config = Self::new(&base_url)?;
        if let Ok(raw) = env::var(POLL_SECS_VAR) {
            config.poll_interval = parse_seconds(POLL_SECS_VAR, &raw)?;
        }
        if let Ok(raw) = env::var(TIMEOUT_SECS_VAR) {
            config.timeout = parse_seconds(TIMEOUT_SECS_VAR, &raw)?;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Resolve an API path such as `tests/3` under `<base>/api/`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Endpoint` if the path cannot be joined.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let root = if self.base_url.path().ends_with("/api/") {
            self.base_url.clone()
        } else {
            self.base_url.join("api/")?
        };
        Ok(root.join(path.trim_start_matches('/'))?)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).map_err(|source| ConfigError::InvalidUrl {
        value: trimmed.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::UnsupportedScheme(trimmed.to_string())),
    }
}

/// Parse a positive whole number of seconds.
///
/// # Errors
///
/// Returns `ConfigError::InvalidSeconds` for zero, negative or non-numeric input.
pub fn parse_seconds(name: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidSeconds {
            name,
            value: raw.to_string(),
        }),
    }
}
