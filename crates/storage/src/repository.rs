use async_trait::async_trait;
use chrono::{DateTime, Utc};
use intellitest_core::model::UserId;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Bearer token kept between launches, plus who it belonged to when saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub access_token: String,
    pub username: Option<String>,
    pub user_id: Option<UserId>,
    pub saved_at: DateTime<Utc>,
}

impl StoredCredentials {
    #[must_use]
    pub fn new(access_token: impl Into<String>, saved_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            username: None,
            user_id: None,
            saved_at,
        }
    }

    #[must_use]
    pub fn with_user(mut self, user_id: UserId, username: impl Into<String>) -> Self {
        self.user_id = Some(user_id);
        self.username = Some(username.into());
        self
    }
}

/// Repository contract for the single stored credential slot.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Fetch the stored credentials, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn load_credentials(&self) -> Result<Option<StoredCredentials>, StorageError>;

    /// Replace the stored credentials.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the credentials cannot be written.
    async fn save_credentials(&self, credentials: &StoredCredentials) -> Result<(), StorageError>;

    /// Forget the stored credentials. Clearing an empty slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn clear_credentials(&self) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    credentials: Arc<Mutex<Option<StoredCredentials>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialRepository for InMemoryRepository {
    async fn load_credentials(&self) -> Result<Option<StoredCredentials>, StorageError> {
        let guard = self
            .credentials
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_credentials(&self, credentials: &StoredCredentials) -> Result<(), StorageError> {
        let mut guard = self
            .credentials
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(credentials.clone());
        Ok(())
    }

    async fn clear_credentials(&self) -> Result<(), StorageError> {
        let mut guard = self
            .credentials
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.take();
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub credentials: Arc<dyn CredentialRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let credentials: Arc<dyn CredentialRepository> = Arc::new(InMemoryRepository::new());
        Self { credentials }
    }
}
