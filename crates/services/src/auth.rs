use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use intellitest_core::Clock;
use intellitest_core::model::{Role, User};
use storage::repository::{CredentialRepository, StoredCredentials};

use crate::api::RemoteApi;
use crate::error::{ApiError, AuthError};

/// Who is signed in, and the token that proves it.
///
/// One instance per process; views reach it through the UI context.
pub struct SessionProvider {
    clock: Clock,
    api: Arc<dyn RemoteApi>,
    credentials: Arc<dyn CredentialRepository>,
    identity: RwLock<Option<User>>,
}

impl SessionProvider {
    #[must_use]
    pub fn new(
        clock: Clock,
        api: Arc<dyn RemoteApi>,
        credentials: Arc<dyn CredentialRepository>,
    ) -> Self {
        Self {
            clock,
            api,
            credentials,
            identity: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn api(&self) -> Arc<dyn RemoteApi> {
        Arc::clone(&self.api)
    }

    #[must_use]
    pub fn identity(&self) -> Option<User> {
        self.identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.identity().map(|user| user.role)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }

    fn set_identity(&self, user: Option<User>) {
        *self.identity.write().unwrap_or_else(PoisonError::into_inner) = user;
    }

    /// Restore a previous session from the stored token.
    ///
    /// Any failure (unreadable store, rejected token, unreachable server) leaves the
    /// provider signed out with the stored token cleared.
    pub async fn hydrate(&self) -> Option<User> {
        let stored = match self.credentials.load_credentials().await {
            Ok(stored) => stored?,
            Err(err) => {
                warn!(error = %err, "could not read stored credentials");
                return None;
            }
        };

        self.api.set_token(Some(stored.access_token));
        match self.api.current_user().await {
            Ok(user) => {
                info!(user = %user.username, role = user.role.label(), "session restored");
                self.set_identity(Some(user.clone()));
                Some(user)
            }
            Err(err) => {
                warn!(error = %err, "stored token rejected; signing out");
                self.sign_out_locally();
                if let Err(err) = self.credentials.clear_credentials().await {
                    warn!(error = %err, "could not clear stored credentials");
                }
                None
            }
        }
    }

    /// Exchange username and password for a token and load the identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` for blank input,
    /// `AuthError::InvalidCredentials` when the server rejects them, and
    /// `AuthError::Api` for other failures. On error nothing is stored.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let token = self
            .api
            .login(username, password)
            .await
            .map_err(|err| match err {
                ApiError::Auth | ApiError::Validation(_) => AuthError::InvalidCredentials,
                other => AuthError::Api(other),
            })?;

        self.api.set_token(Some(token.access_token.clone()));
        let user = match self.api.current_user().await {
            Ok(user) => user,
            Err(err) => {
                self.sign_out_locally();
                return Err(err.into());
            }
        };

        let stored = StoredCredentials::new(token.access_token, self.clock.now())
            .with_user(user.id, user.username.clone());
        if let Err(err) = self.credentials.save_credentials(&stored).await {
            warn!(error = %err, "could not persist credentials; session lasts until exit");
        }

        info!(user = %user.username, role = user.role.label(), "signed in");
        self.set_identity(Some(user.clone()));
        Ok(user)
    }

    /// Forget the token in memory and in the store.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the stored token cannot be removed. The in-memory
    /// session is cleared regardless.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.sign_out_locally();
        info!("signed out");
        self.credentials.clear_credentials().await?;
        Ok(())
    }

    fn sign_out_locally(&self) {
        self.api.set_token(None);
        self.set_identity(None);
    }
}
