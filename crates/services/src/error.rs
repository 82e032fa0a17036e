//! Shared error types for the services crate.

use thiserror::Error;

use intellitest_core::AttemptError;
use intellitest_core::FailureReason;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors produced by calls against the REST API.
///
/// Every transport or protocol problem lands in exactly one category so views can
/// pick a recovery path without inspecting raw status codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("not authorized")]
    Auth,
    #[error("request rejected: {0}")]
    Validation(String),
    #[error("not found")]
    NotFound,
    #[error("server error (status {status})")]
    Server { status: u16 },
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
}

impl ApiError {
    /// Categorises a non-success response. `body` is the raw response text.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::Auth,
            404 => Self::NotFound,
            400 | 422 => Self::Validation(detail_message(body)),
            _ => Self::Server { status },
        }
    }

    /// The attempt-level reason for a failed submission.
    #[must_use]
    pub fn failure_reason(&self) -> FailureReason {
        match self {
            Self::Network(_) | Self::Endpoint(_) => FailureReason::Network,
            Self::Auth => FailureReason::Auth,
            Self::Validation(detail) => FailureReason::Validation(detail.clone()),
            Self::NotFound => FailureReason::NotFound,
            Self::Server { status } => FailureReason::Server(*status),
        }
    }

    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        Self::Endpoint(err.to_string())
    }
}

/// Pulls a readable message out of a `{"detail": ...}` error body.
///
/// `detail` is either a string or a list of `{"msg": ...}` validation items.
fn detail_message(body: &str) -> String {
    let fallback = || {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            "request rejected".to_string()
        } else {
            trimmed.to_string()
        }
    };

    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return fallback();
    };
    match value.get("detail") {
        Some(serde_json::Value::String(detail)) => detail.clone(),
        Some(serde_json::Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .collect();
            if messages.is_empty() {
                fallback()
            } else {
                messages.join("; ")
            }
        }
        _ => fallback(),
    }
}

/// Errors from reading client configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid API url `{value}`: {source}")]
    InvalidUrl {
        value: String,
        source: url::ParseError,
    },
    #[error("API url must use http or https: {0}")]
    UnsupportedScheme(String),
    #[error("invalid {name} `{value}`: expected a whole number of seconds")]
    InvalidSeconds { name: &'static str, value: String },
}

/// Errors from starting a timer-driven task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ScheduleError {
    #[error("no tokio runtime is running on this thread")]
    NoRuntime,
}

/// Errors emitted by `SessionProvider`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("username and password are required")]
    MissingCredentials,
    #[error("incorrect username or password")]
    InvalidCredentials,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by test-session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("test could not be loaded: {0}")]
    Load(#[from] ApiError),
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorises_statuses() {
        assert_eq!(ApiError::from_status(401, ""), ApiError::Auth);
        assert_eq!(ApiError::from_status(403, ""), ApiError::Auth);
        assert_eq!(ApiError::from_status(404, ""), ApiError::NotFound);
        assert_eq!(
            ApiError::from_status(503, "oops"),
            ApiError::Server { status: 503 }
        );
    }

    #[test]
    fn validation_uses_server_detail() {
        let err = ApiError::from_status(400, r#"{"detail": "Already submitted"}"#);
        assert_eq!(err, ApiError::Validation("Already submitted".into()));
        assert_eq!(
            err.failure_reason(),
            FailureReason::Validation("Already submitted".into())
        );
    }

    #[test]
    fn validation_joins_field_errors() {
        let body = r#"{"detail": [{"loc": ["body", "test_id"], "msg": "field required"},
                                  {"loc": ["body", "answers"], "msg": "value is not a list"}]}"#;
        assert_eq!(
            ApiError::from_status(422, body),
            ApiError::Validation("field required; value is not a list".into())
        );
    }

    #[test]
    fn validation_falls_back_to_body_text() {
        assert_eq!(
            ApiError::from_status(400, "  bad input "),
            ApiError::Validation("bad input".into())
        );
        assert_eq!(
            ApiError::from_status(400, ""),
            ApiError::Validation("request rejected".into())
        );
    }

    #[test]
    fn maps_to_failure_reasons() {
        assert_eq!(
            ApiError::Network("reset".into()).failure_reason(),
            FailureReason::Network
        );
        assert_eq!(
            ApiError::Server { status: 500 }.failure_reason(),
            FailureReason::Server(500)
        );
        assert_eq!(ApiError::NotFound.failure_reason(), FailureReason::NotFound);
    }
}
