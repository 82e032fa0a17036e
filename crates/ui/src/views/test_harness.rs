use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};

use intellitest_core::model::{
    Difficulty, ProgressSnapshot, Question, QuestionId, Role, Submission, SubmissionId,
    SubmissionReceipt, Test, TestId, User, UserId,
};
use intellitest_core::time::{fixed_clock, fixed_now};
use services::api::{AccessToken, RemoteApi};
use services::{ApiError, AppServices};
use storage::repository::Storage;

use crate::context::{Identity, Notice, UiApp, build_app_context};
use crate::views::{
    AvailableTestsView, DashboardView, LoginView, MonitoringView, NoticeBar, ResultsView,
    TakeTestView,
};

/// Canned API answers for view tests.
#[derive(Default)]
pub struct FakeApi {
    pub tests: Mutex<HashMap<TestId, Test>>,
    pub submissions: Mutex<Vec<SubmissionReceipt>>,
    pub progress: Mutex<HashMap<TestId, Vec<ProgressSnapshot>>>,
    pub failure: Mutex<Option<ApiError>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_test(self: Arc<Self>, test: Test) -> Arc<Self> {
        self.tests.lock().unwrap().insert(test.id, test);
        self
    }

    pub fn with_submission(self: Arc<Self>, receipt: SubmissionReceipt) -> Arc<Self> {
        self.submissions.lock().unwrap().push(receipt);
        self
    }

    pub fn failing(self: Arc<Self>, err: ApiError) -> Arc<Self> {
        *self.failure.lock().unwrap() = Some(err);
        self
    }

    fn check(&self) -> Result<(), ApiError> {
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn listed(&self, live_only: bool) -> Vec<Test> {
        let mut tests: Vec<Test> = self
            .tests
            .lock()
            .unwrap()
            .values()
            .filter(|test| !live_only || test.is_live)
            .map(|test| Test {
                questions: Vec::new(),
                ..test.clone()
            })
            .collect();
        tests.sort_by_key(|test| test.id);
        tests
    }
}

#[async_trait]
impl RemoteApi for FakeApi {
    fn set_token(&self, _token: Option<String>) {}

    fn has_token(&self) -> bool {
        true
    }

    async fn login(&self, _username: &str, _password: &str) -> Result<AccessToken, ApiError> {
        Err(ApiError::Auth)
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        Err(ApiError::Auth)
    }

    async fn list_tests(&self, live_only: bool) -> Result<Vec<Test>, ApiError> {
        self.check()?;
        Ok(self.listed(live_only))
    }

    async fn get_test(&self, id: TestId) -> Result<Test, ApiError> {
        self.check()?;
        self.tests
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn submit(&self, submission: &Submission) -> Result<SubmissionReceipt, ApiError> {
        self.check()?;
        Ok(receipt(submission.test_id, Some(100.0)))
    }

    async fn my_submissions(&self) -> Result<Vec<SubmissionReceipt>, ApiError> {
        self.check()?;
        Ok(self.submissions.lock().unwrap().clone())
    }

    async fn live_tests(&self) -> Result<Vec<Test>, ApiError> {
        self.check()?;
        Ok(self.listed(true))
    }

    async fn test_progress(&self, id: TestId) -> Result<Vec<ProgressSnapshot>, ApiError> {
        self.check()?;
        Ok(self
            .progress
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }
}

pub fn user(role: Role, class_name: Option<&str>) -> User {
    User {
        id: UserId::new(1),
        username: "ana".into(),
        full_name: "Ana Lima".into(),
        role,
        email: None,
        class_name: class_name.map(str::to_string),
        school_name: None,
    }
}

pub fn live_test(id: u64, minutes: u32, classes: &str, questions: u64) -> Test {
    Test {
        id: TestId::new(id),
        name: format!("Quiz {id}"),
        description: None,
        duration_minutes: minutes,
        assigned_classes: Some(classes.to_string()),
        is_live: true,
        questions: (1..=questions)
            .map(|n| Question {
                id: QuestionId::new(id * 100 + n),
                question_text: format!("What is {n} + {n}?"),
                option_a: format!("{}", n),
                option_b: format!("{}", n * 2),
                option_c: format!("{}", n * 3),
                option_d: "none".into(),
                correct_answer: None,
                topic: Some("arithmetic".into()),
                difficulty_level: Difficulty::Easy,
                image_url: None,
            })
            .collect(),
    }
}

pub fn receipt(test_id: TestId, score: Option<f64>) -> SubmissionReceipt {
    SubmissionReceipt {
        id: SubmissionId::new(test_id.value() + 500),
        test_id,
        student_id: Some(UserId::new(1)),
        score,
        total_questions: Some(4),
        attempted_questions: Some(3),
        submitted_at: Some(fixed_now()),
        is_auto_submitted: Some(false),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Login,
    Dashboard,
    AvailableTests,
    TakeTest(u64),
    Results,
    Monitoring,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<AppServices>,
    user: Option<User>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| Identity::new(props.user.clone()));
    use_context_provider(Notice::new);
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    let body = match view {
        ViewKind::Login => rsx! { LoginView {} },
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::AvailableTests => rsx! { AvailableTestsView {} },
        ViewKind::TakeTest(test_id) => rsx! { TakeTestView { test_id } },
        ViewKind::Results => rsx! { ResultsView {} },
        ViewKind::Monitoring => rsx! { MonitoringView {} },
    };
    rsx! {
        NoticeBar {}
        {body}
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub api: Arc<FakeApi>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then let spawned futures and resources finish.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..5 {
            self.drive_async().await;
        }
    }

    /// Keep driving until `needle` shows up or the attempts run out.
    pub async fn settle_until(&mut self, needle: &str) -> String {
        for _ in 0..20 {
            let html = self.render();
            if html.contains(needle) {
                return html;
            }
            self.drive_async().await;
        }
        self.render()
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, user: Option<User>, api: Arc<FakeApi>) -> ViewHarness {
    let remote: Arc<dyn RemoteApi> = api.clone();
    let app = Arc::new(AppServices::with_api(
        remote,
        Storage::in_memory(),
        fixed_clock(),
        Duration::from_secs(5),
    ));
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, user, view });
    ViewHarness { dom, api }
}
