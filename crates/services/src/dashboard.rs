use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use intellitest_core::model::{SubmissionReceipt, Test, TestId, User};

use crate::api::RemoteApi;
use crate::error::ApiError;

/// Whether the learner still has to take a visible test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    Available,
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardTest {
    pub test: Test,
    pub status: TestStatus,
    pub receipt: Option<SubmissionReceipt>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub available: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Something the learner should be told instead of being shown an empty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardNotice {
    NoClassAssigned,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentDashboard {
    pub tests: Vec<DashboardTest>,
    pub stats: DashboardStats,
    pub notice: Option<DashboardNotice>,
}

/// One row of the learner's results page.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub test_name: String,
    pub receipt: SubmissionReceipt,
}

/// Builds the learner's dashboard from live tests and their own submissions.
///
/// A test is visible when the learner's class appears in its comma-separated
/// `assigned_classes`. Completed counts every submission on record; pending counts
/// visible tests that have none.
#[must_use]
pub fn build_student_dashboard(
    user: &User,
    live_tests: Vec<Test>,
    submissions: Vec<SubmissionReceipt>,
) -> StudentDashboard {
    let Some(class_name) = user.class() else {
        return StudentDashboard {
            tests: Vec::new(),
            stats: DashboardStats {
                completed: submissions.len(),
                ..DashboardStats::default()
            },
            notice: Some(DashboardNotice::NoClassAssigned),
        };
    };

    let completed = submissions.len();
    let mut by_test: HashMap<TestId, SubmissionReceipt> = HashMap::new();
    for receipt in submissions {
        by_test.entry(receipt.test_id).or_insert(receipt);
    }

    let tests: Vec<DashboardTest> = live_tests
        .into_iter()
        .filter(|test| test.is_assigned_to(class_name))
        .map(|test| {
            let receipt = by_test.get(&test.id).cloned();
            let status = if receipt.is_some() {
                TestStatus::Completed
            } else {
                TestStatus::Available
            };
            DashboardTest {
                test,
                status,
                receipt,
            }
        })
        .collect();

    let pending = tests
        .iter()
        .filter(|entry| entry.status == TestStatus::Available)
        .count();

    StudentDashboard {
        stats: DashboardStats {
            available: tests.len(),
            completed,
            pending,
        },
        tests,
        notice: None,
    }
}

/// Pairs receipts with test names, newest first. Unknown tests get a numbered label.
#[must_use]
pub fn build_results(tests: &[Test], mut submissions: Vec<SubmissionReceipt>) -> Vec<ResultRow> {
    let names: HashMap<TestId, &str> = tests
        .iter()
        .map(|test| (test.id, test.name.as_str()))
        .collect();
    submissions.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    submissions
        .into_iter()
        .map(|receipt| ResultRow {
            test_name: names
                .get(&receipt.test_id)
                .map_or_else(|| format!("Test #{}", receipt.test_id), |name| (*name).to_string()),
            receipt,
        })
        .collect()
}

pub struct DashboardService {
    api: Arc<dyn RemoteApi>,
}

impl DashboardService {
    #[must_use]
    pub fn new(api: Arc<dyn RemoteApi>) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `ApiError` if either request fails.
    pub async fn student_dashboard(&self, user: &User) -> Result<StudentDashboard, ApiError> {
        let (live_tests, submissions) =
            tokio::try_join!(self.api.list_tests(true), self.api.my_submissions())?;
        debug!(
            live = live_tests.len(),
            submissions = submissions.len(),
            "student dashboard loaded"
        );
        Ok(build_student_dashboard(user, live_tests, submissions))
    }

    /// # Errors
    ///
    /// Returns `ApiError` if either request fails.
    pub async fn results(&self) -> Result<Vec<ResultRow>, ApiError> {
        let (tests, submissions) =
            tokio::try_join!(self.api.list_tests(false), self.api.my_submissions())?;
        Ok(build_results(&tests, submissions))
    }

    /// Live tests for the staff overview.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn staff_overview(&self) -> Result<Vec<Test>, ApiError> {
        self.api.live_tests().await
    }
}
