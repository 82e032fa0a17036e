use intellitest_core::model::{ProgressSnapshot, ProgressStatus, Role, TestId, UserId};
use services::ApiError;

use super::test_harness::{FakeApi, ViewKind, live_test, receipt, setup_view_harness, user};

#[tokio::test(flavor = "current_thread")]
async fn login_view_smoke_renders_form() {
    let mut harness = setup_view_harness(ViewKind::Login, None, FakeApi::new());
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Username"), "missing username in {html}");
    assert!(html.contains("Password"), "missing password in {html}");
    assert!(html.contains("Sign in"), "missing button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn student_dashboard_lists_pending_tests_for_own_class() {
    let api = FakeApi::new()
        .with_test(live_test(1, 30, "10A, 10B", 0))
        .with_test(live_test(2, 30, "11C", 0))
        .with_test(live_test(3, 45, "10A", 0))
        .with_submission(receipt(TestId::new(3), Some(90.0)));
    let mut harness =
        setup_view_harness(ViewKind::Dashboard, Some(user(Role::Student, Some("10A"))), api);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Welcome back, Ana"), "missing greeting in {html}");
    assert!(html.contains("Waiting for you"), "missing pending list in {html}");
    assert!(html.contains("Quiz 1"), "missing assigned test in {html}");
    assert!(!html.contains("Quiz 2"), "other class test shown in {html}");
    assert!(html.contains("Start test"), "missing start link in {html}");
    assert!(html.contains("Pending"), "missing stats in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn student_without_class_sees_notice() {
    let api = FakeApi::new().with_test(live_test(1, 30, "10A", 0));
    let mut harness =
        setup_view_harness(ViewKind::AvailableTests, Some(user(Role::Student, None)), api);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("not assigned to a class"), "missing notice in {html}");
    assert!(!html.contains("Quiz 1"), "test shown without class in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn available_tests_mark_completed_ones() {
    let api = FakeApi::new()
        .with_test(live_test(1, 60, "10A", 0))
        .with_test(live_test(2, 20, "10A", 0))
        .with_submission(receipt(TestId::new(2), Some(75.0)));
    let mut harness = setup_view_harness(
        ViewKind::AvailableTests,
        Some(user(Role::Student, Some("10A"))),
        api,
    );
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("1 hour"), "missing duration in {html}");
    assert!(html.contains("75.0%"), "missing score in {html}");
    assert!(html.contains("Start test"), "missing start link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_renders_rows() {
    let api = FakeApi::new()
        .with_test(live_test(4, 30, "10A", 0))
        .with_submission(receipt(TestId::new(4), Some(62.5)))
        .with_submission(receipt(TestId::new(9), None));
    let mut harness =
        setup_view_harness(ViewKind::Results, Some(user(Role::Student, Some("10A"))), api);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Quiz 4"), "missing test name in {html}");
    assert!(html.contains("62.5%"), "missing score in {html}");
    assert!(html.contains("Test #9"), "missing fallback name in {html}");
    assert!(html.contains("Pending"), "missing pending score in {html}");
    assert!(html.contains("3 / 4"), "missing attempted count in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_shows_retry_on_server_error() {
    let api = FakeApi::new().failing(ApiError::Server { status: 500 });
    let mut harness =
        setup_view_harness(ViewKind::Results, Some(user(Role::Student, Some("10A"))), api);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn take_test_view_waits_for_start_before_counting_down() {
    let api = FakeApi::new().with_test(live_test(7, 10, "10A", 2));
    let mut harness = setup_view_harness(
        ViewKind::TakeTest(7),
        Some(user(Role::Student, Some("10A"))),
        api,
    );
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Quiz 7"), "missing title in {html}");
    assert!(html.contains("10 minutes"), "missing time limit in {html}");
    assert!(html.contains("2 questions"), "missing question count in {html}");
    assert!(html.contains("Start test"), "missing start button in {html}");
    assert!(!html.contains("role=\"timer\""), "timer running before start in {html}");
    assert!(!html.contains("What is 2 + 2?"), "questions shown before start in {html}");
    assert!(!html.contains("Submit test"), "submit offered before start in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn take_test_view_sends_missing_test_back_with_notice() {
    let mut harness = setup_view_harness(
        ViewKind::TakeTest(99),
        Some(user(Role::Student, Some("10A"))),
        FakeApi::new(),
    );
    harness.settle().await;

    let html = harness.settle_until("could not be opened").await;
    assert!(
        html.contains("The test could not be opened. This item is no longer available."),
        "missing notice in {html}"
    );
    assert!(html.contains("Dismiss"), "notice cannot be dismissed in {html}");
    assert!(!html.contains("Start test"), "start offered for missing test in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn monitoring_view_follows_first_live_test() {
    let api = FakeApi::new()
        .with_test(live_test(5, 30, "10A", 0))
        .with_test(live_test(6, 30, "10B", 0));
    api.progress.lock().unwrap().insert(
        TestId::new(5),
        vec![ProgressSnapshot {
            user_id: UserId::new(2),
            user_name: "Bora Kim".into(),
            class_name: Some("10A".into()),
            attempted_questions: 1,
            total_questions: 4,
            status: ProgressStatus::InProgress,
        }],
    );
    let mut harness =
        setup_view_harness(ViewKind::Monitoring, Some(user(Role::Teacher, None)), api);
    harness.settle().await;

    let html = harness.settle_until("Bora Kim").await;
    assert!(html.contains("Live monitoring"), "missing heading in {html}");
    assert!(html.contains("Quiz 5"), "missing live test in {html}");
    assert!(html.contains("Quiz 6"), "missing second live test in {html}");
    assert!(html.contains("live-test selected"), "first test not selected in {html}");
    assert!(html.contains("Bora Kim"), "missing student row in {html}");
    assert!(!html.contains("Select a live test"), "prompt shown while following in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn monitoring_view_prompts_when_nothing_is_live() {
    let mut harness = setup_view_harness(
        ViewKind::Monitoring,
        Some(user(Role::Teacher, None)),
        FakeApi::new(),
    );
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("No tests are live right now."), "missing empty state in {html}");
    assert!(html.contains("Select a live test"), "missing prompt in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn staff_dashboard_links_to_monitoring() {
    let api = FakeApi::new().with_test(live_test(5, 30, "10A, 10B", 0));
    let mut harness =
        setup_view_harness(ViewKind::Dashboard, Some(user(Role::Teacher, None)), api);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Signed in as Teacher"), "missing role in {html}");
    assert!(html.contains("Live tests"), "missing stat in {html}");
    assert!(html.contains("Open live monitoring"), "missing link in {html}");
}
