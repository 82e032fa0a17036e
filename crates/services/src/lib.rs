#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod monitoring;
pub mod schedule;
pub mod sessions;

pub use intellitest_core::Clock;

pub use api::{HttpApi, RemoteApi};
pub use app_services::AppServices;
pub use auth::SessionProvider;
pub use config::ApiConfig;
pub use dashboard::{
    DashboardNotice, DashboardService, DashboardStats, DashboardTest, ResultRow, StudentDashboard,
    TestStatus,
};
pub use error::{ApiError, AppServicesError, AuthError, ConfigError, ScheduleError, SessionError};
pub use monitoring::{MonitorBoard, MonitoringPoller, MonitoringService};
pub use schedule::{FirstTick, Schedule};
pub use sessions::{AttemptDriver, AttemptView, SubmitOutcome, TestSessionService};
