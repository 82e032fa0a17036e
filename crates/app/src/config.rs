use std::fmt;

use services::ApiConfig;
use services::ConfigError;
use services::config::{DEFAULT_API_URL, POLL_SECS_VAR, parse_seconds};

pub const DB_URL_VAR: &str = "INTELLITEST_DB_URL";
pub const DEFAULT_DB_URL: &str = "sqlite://intellitest.sqlite3";

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    Config(ConfigError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ArgsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArgsError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for ArgsError {
    fn from(err: ConfigError) -> Self {
        ArgsError::Config(err)
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

/// Everything the binary needs before launching the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub db_url: String,
}

impl AppConfig {
    /// Built-in defaults, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Only fails if the compiled-in API url is invalid.
    pub fn defaults() -> Result<Self, ArgsError> {
        Ok(Self {
            api: ApiConfig::new(DEFAULT_API_URL)?,
            db_url: normalize_sqlite_url(DEFAULT_DB_URL.to_string()),
        })
    }

    /// Defaults overlaid with `INTELLITEST_*` variables. Call after loading `.env`.
    ///
    /// # Errors
    ///
    /// Returns `ArgsError::Config` for malformed variables.
    pub fn from_env() -> Result<Self, ArgsError> {
        let api = ApiConfig::from_env()?;
        let db_url = std::env::var(DB_URL_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DB_URL.to_string());
        Ok(Self {
            api,
            db_url: normalize_sqlite_url(db_url),
        })
    }

    /// Apply command-line flags on top of `self`.
    ///
    /// # Errors
    ///
    /// Returns `ArgsError` for unknown flags, missing values or invalid values.
    pub fn with_args(mut self, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" => {
                    let value = require_value(args, "--api-url")?;
                    self.api = ApiConfig::new(&value)?
                        .with_timeout(self.api.timeout())
                        .with_poll_interval(self.api.poll_interval());
                }
                "--poll-secs" => {
                    let value = require_value(args, "--poll-secs")?;
                    let interval = parse_seconds(POLL_SECS_VAR, &value)?;
                    self.api = self.api.with_poll_interval(interval);
                }
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    self.db_url = normalize_sqlite_url(value);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(self)
    }
}

pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}
