//! REST API access behind a trait, so services can run against a fake in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use intellitest_core::model::{
    ProgressSnapshot, Submission, SubmissionReceipt, Test, TestId, User,
};

use crate::error::ApiError;

mod http;

pub use http::HttpApi;

/// Body of `POST /auth/login-json`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Bearer token issued at login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Calls the client makes against the server. The bearer token, when set, is sent on every call.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    fn set_token(&self, token: Option<String>);

    fn has_token(&self) -> bool;

    /// # Errors
    ///
    /// `ApiError::Auth` for rejected credentials, other categories for transport problems.
    async fn login(&self, username: &str, password: &str) -> Result<AccessToken, ApiError>;

    /// # Errors
    ///
    /// `ApiError::Auth` when the token is missing or no longer valid.
    async fn current_user(&self) -> Result<User, ApiError>;

    /// Tests visible to the caller; `live_only` adds `is_live=true`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or status failure.
    async fn list_tests(&self, live_only: bool) -> Result<Vec<Test>, ApiError>;

    /// One test with its ordered questions.
    ///
    /// # Errors
    ///
    /// `ApiError::NotFound` if the test does not exist.
    async fn get_test(&self, id: TestId) -> Result<Test, ApiError>;

    /// # Errors
    ///
    /// `ApiError::Validation` when the server refuses the submission (already submitted,
    /// test not live), other categories for transport problems.
    async fn submit(&self, submission: &Submission) -> Result<SubmissionReceipt, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport or status failure.
    async fn my_submissions(&self) -> Result<Vec<SubmissionReceipt>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport or status failure.
    async fn live_tests(&self) -> Result<Vec<Test>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport or status failure, or if the body is neither shape.
    async fn test_progress(&self, id: TestId) -> Result<Vec<ProgressSnapshot>, ApiError>;
}
