mod common;
mod dashboard;
mod login;
mod monitoring;
mod results;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use available_tests::AvailableTestsView;
pub use common::NoticeBar;
pub use dashboard::DashboardView;
pub use login::LoginView;
pub use monitoring::MonitoringView;
pub use results::ResultsView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use take_test::TakeTestView;
