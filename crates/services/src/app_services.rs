use std::sync::Arc;
use std::time::Duration;

use intellitest_core::Clock;
use storage::repository::Storage;

use crate::api::{HttpApi, RemoteApi};
use crate::auth::SessionProvider;
use crate::config::ApiConfig;
use crate::dashboard::DashboardService;
use crate::error::AppServicesError;
use crate::monitoring::MonitoringService;
use crate::sessions::TestSessionService;

/// Assembles app-facing services around one API client and one credential store.
#[derive(Clone)]
pub struct AppServices {
    session: Arc<SessionProvider>,
    test_sessions: Arc<TestSessionService>,
    monitoring: Arc<MonitoringService>,
    dashboard: Arc<DashboardService>,
    poll_interval: Duration,
}

impl AppServices {
    /// Build services with the credential store at `db_url`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the store cannot be opened or the HTTP client
    /// cannot be built.
    pub async fn new_sqlite(
        config: ApiConfig,
        db_url: &str,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let api: Arc<dyn RemoteApi> = Arc::new(HttpApi::new(config.clone())?);
        Ok(Self::with_api(api, storage, clock, config.poll_interval()))
    }

    /// Build services over any API implementation.
    #[must_use]
    pub fn with_api(
        api: Arc<dyn RemoteApi>,
        storage: Storage,
        clock: Clock,
        poll_interval: Duration,
    ) -> Self {
        let session = Arc::new(SessionProvider::new(
            clock,
            Arc::clone(&api),
            Arc::clone(&storage.credentials),
        ));
        let test_sessions = Arc::new(TestSessionService::new(clock, Arc::clone(&api)));
        let monitoring = Arc::new(MonitoringService::new(clock, Arc::clone(&api)));
        let dashboard = Arc::new(DashboardService::new(api));

        Self {
            session,
            test_sessions,
            monitoring,
            dashboard,
            poll_interval,
        }
    }

    #[must_use]
    pub fn session(&self) -> Arc<SessionProvider> {
        Arc::clone(&self.session)
    }

    #[must_use]
    pub fn test_sessions(&self) -> Arc<TestSessionService> {
        Arc::clone(&self.test_sessions)
    }

    #[must_use]
    pub fn monitoring(&self) -> Arc<MonitoringService> {
        Arc::clone(&self.monitoring)
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}
