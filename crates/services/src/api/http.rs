use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use intellitest_core::model::{
    ProgressPayload, ProgressSnapshot, Submission, SubmissionReceipt, Test, TestId, User,
};

use super::{AccessToken, LoginRequest, RemoteApi};
use crate::config::ApiConfig;
use crate::error::ApiError;

/// `reqwest`-backed client for the IntelliTest REST API.
pub struct HttpApi {
    client: Client,
    config: ApiConfig,
    token: RwLock<Option<String>>,
}

impl HttpApi {
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            config,
            token: RwLock::new(None),
        })
    }

    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.config.endpoint(path)?;
        debug!(%method, %url, "api request");
        let builder = self.client.request(method, url);
        Ok(match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "api request failed");
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl RemoteApi for HttpApi {
    fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn has_token(&self) -> bool {
        self.token().is_some()
    }

    async fn login(&self, username: &str, password: &str) -> Result<AccessToken, ApiError> {
        let builder = self
            .request(Method::POST, "auth/login-json")?
            .json(&LoginRequest { username, password });
        self.execute(builder).await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        let builder = self.request(Method::GET, "users/me")?;
        self.execute(builder).await
    }

    async fn list_tests(&self, live_only: bool) -> Result<Vec<Test>, ApiError> {
        let mut builder = self.request(Method::GET, "tests")?;
        if live_only {
            builder = builder.query(&[("is_live", "true")]);
        }
        self.execute(builder).await
    }

    async fn get_test(&self, id: TestId) -> Result<Test, ApiError> {
        let builder = self.request(Method::GET, &format!("tests/{}", id.value()))?;
        self.execute(builder).await
    }

    async fn submit(&self, submission: &Submission) -> Result<SubmissionReceipt, ApiError> {
        let builder = self.request(Method::POST, "submissions")?.json(submission);
        self.execute(builder).await
    }

    async fn my_submissions(&self) -> Result<Vec<SubmissionReceipt>, ApiError> {
        let builder = self.request(Method::GET, "submissions/my-submissions")?;
        self.execute(builder).await
    }

    async fn live_tests(&self) -> Result<Vec<Test>, ApiError> {
        let builder = self.request(Method::GET, "monitoring/live-tests")?;
        self.execute(builder).await
    }

    async fn test_progress(&self, id: TestId) -> Result<Vec<ProgressSnapshot>, ApiError> {
        let path = format!("monitoring/test/{}/progress", id.value());
        let builder = self.request(Method::GET, &path)?;
        let payload: ProgressPayload = self.execute(builder).await?;
        Ok(payload.into_snapshots())
    }
}
