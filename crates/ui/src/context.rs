use std::sync::Arc;
use std::time::Duration;

use dioxus::prelude::*;

use intellitest_core::model::{Role, User};
use services::{
    AppServices, DashboardService, MonitoringService, SessionProvider, TestSessionService,
};

pub trait UiApp: Send + Sync {
    fn session(&self) -> Arc<SessionProvider>;
    fn test_sessions(&self) -> Arc<TestSessionService>;
    fn monitoring(&self) -> Arc<MonitoringService>;
    fn dashboard(&self) -> Arc<DashboardService>;
    fn poll_interval(&self) -> Duration;
}

impl UiApp for AppServices {
    fn session(&self) -> Arc<SessionProvider> {
        AppServices::session(self)
    }

    fn test_sessions(&self) -> Arc<TestSessionService> {
        AppServices::test_sessions(self)
    }

    fn monitoring(&self) -> Arc<MonitoringService> {
        AppServices::monitoring(self)
    }

    fn dashboard(&self) -> Arc<DashboardService> {
        AppServices::dashboard(self)
    }

    fn poll_interval(&self) -> Duration {
        AppServices::poll_interval(self)
    }
}

#[derive(Clone)]
pub struct AppContext {
    session: Arc<SessionProvider>,
    test_sessions: Arc<TestSessionService>,
    monitoring: Arc<MonitoringService>,
    dashboard: Arc<DashboardService>,
    poll_interval: Duration,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            session: app.session(),
            test_sessions: app.test_sessions(),
            monitoring: app.monitoring(),
            dashboard: app.dashboard(),
            poll_interval: app.poll_interval(),
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

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

/// Reactive copy of the signed-in user, provided once at the root.
///
/// `SessionProvider` stays the source of truth; views update this alongside it so the
/// layout re-renders on sign-in and sign-out.
#[derive(Clone, Copy)]
pub struct Identity(Signal<Option<User>>);

impl Identity {
    #[must_use]
    pub fn new(user: Option<User>) -> Self {
        Self(Signal::new(user))
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.0.read().clone()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.0.read().as_ref().map(|user| user.role)
    }

    pub fn sign_in(&mut self, user: User) {
        self.0.set(Some(user));
    }

    pub fn sign_out(&mut self) {
        self.0.set(None);
    }
}

/// One-off message for the next page, e.g. why a view sent the user back.
#[derive(Clone, Copy)]
pub struct Notice(Signal<Option<String>>);

impl Notice {
    #[must_use]
    pub fn new() -> Self {
        Self(Signal::new(None))
    }

    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.0.read().clone()
    }

    pub fn show(&mut self, message: impl Into<String>) {
        self.0.set(Some(message.into()));
    }

    pub fn dismiss(&mut self) {
        self.0.set(None);
    }
}

impl Default for Notice {
    fn default() -> Self {
        Self::new()
    }
}
