#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use intellitest_core::model::{
    Difficulty, ProgressSnapshot, ProgressStatus, Question, Role, Submission, SubmissionId,
    SubmissionReceipt, Test, TestId, User, UserId,
};
use services::api::{AccessToken, RemoteApi};
use services::error::ApiError;

pub const GOOD_TOKEN: &str = "good-token";
pub const PASSWORD: &str = "secret";

/// In-process stand-in for the REST API that records what it was asked.
#[derive(Default)]
pub struct FakeApi {
    pub token: Mutex<Option<String>>,
    pub user: Mutex<Option<User>>,
    pub tests: Mutex<HashMap<TestId, Test>>,
    pub my_submissions: Mutex<Vec<SubmissionReceipt>>,
    pub submissions: Mutex<Vec<Submission>>,
    pub submit_results: Mutex<VecDeque<Result<SubmissionReceipt, ApiError>>>,
    pub submit_gate: Mutex<Option<Arc<Notify>>>,
    pub submit_needs_token: Mutex<bool>,
    pub progress: Mutex<HashMap<TestId, Result<Vec<ProgressSnapshot>, ApiError>>>,
    pub progress_calls: Mutex<Vec<TestId>>,
    pub progress_delay: Mutex<Option<Duration>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_user(self: Arc<Self>, user: User) -> Arc<Self> {
        *self.user.lock().unwrap() = Some(user);
        self
    }

    pub fn with_test(self: Arc<Self>, test: Test) -> Arc<Self> {
        self.tests.lock().unwrap().insert(test.id, test);
        self
    }

    /// Reject submissions unless the current token is the one `login` hands out.
    pub fn with_checked_submissions(self: Arc<Self>) -> Arc<Self> {
        *self.submit_needs_token.lock().unwrap() = true;
        self
    }

    pub fn submitted(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn progress_calls_for(&self, test_id: TestId) -> usize {
        self.progress_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|id| **id == test_id)
            .count()
    }

    pub fn set_progress(&self, test_id: TestId, result: Result<Vec<ProgressSnapshot>, ApiError>) {
        self.progress.lock().unwrap().insert(test_id, result);
    }

    pub fn hold_submissions(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.submit_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    fn authorized(&self) -> Result<(), ApiError> {
        match self.token.lock().unwrap().as_deref() {
            Some(GOOD_TOKEN) => Ok(()),
            _ => Err(ApiError::Auth),
        }
    }
}

#[async_trait]
impl RemoteApi for FakeApi {
    fn set_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }

    fn has_token(&self) -> bool {
        self.token.lock().unwrap().is_some()
    }

    async fn login(&self, username: &str, password: &str) -> Result<AccessToken, ApiError> {
        let known = self
            .user
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|user| user.username == username);
        if known && password == PASSWORD {
            Ok(AccessToken {
                access_token: GOOD_TOKEN.to_string(),
                token_type: "bearer".to_string(),
            })
        } else {
            Err(ApiError::Auth)
        }
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.authorized()?;
        self.user.lock().unwrap().clone().ok_or(ApiError::NotFound)
    }

    async fn list_tests(&self, live_only: bool) -> Result<Vec<Test>, ApiError> {
        let mut tests: Vec<Test> = self
            .tests
            .lock()
            .unwrap()
            .values()
            .filter(|test| !live_only || test.is_live)
            .cloned()
            .collect();
        tests.sort_by_key(|test| test.id);
        Ok(tests)
    }

    async fn get_test(&self, id: TestId) -> Result<Test, ApiError> {
        self.tests
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn submit(&self, submission: &Submission) -> Result<SubmissionReceipt, ApiError> {
        self.submissions.lock().unwrap().push(submission.clone());
        if *self.submit_needs_token.lock().unwrap() {
            self.authorized()?;
        }
        let gate = self.submit_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let scripted = self.submit_results.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(receipt_for(submission)))
    }

    async fn my_submissions(&self) -> Result<Vec<SubmissionReceipt>, ApiError> {
        Ok(self.my_submissions.lock().unwrap().clone())
    }

    async fn live_tests(&self) -> Result<Vec<Test>, ApiError> {
        self.list_tests(true).await
    }

    async fn test_progress(&self, id: TestId) -> Result<Vec<ProgressSnapshot>, ApiError> {
        self.progress_calls.lock().unwrap().push(id);
        let delay = *self.progress_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.progress
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub fn receipt_for(submission: &Submission) -> SubmissionReceipt {
    SubmissionReceipt {
        id: SubmissionId::new(100 + submission.test_id.value()),
        test_id: submission.test_id,
        student_id: Some(UserId::new(1)),
        score: None,
        total_questions: u32::try_from(submission.answers.len()).ok(),
        attempted_questions: u32::try_from(submission.attempted()).ok(),
        submitted_at: None,
        is_auto_submitted: None,
    }
}

pub fn student(class_name: &str) -> User {
    User {
        id: UserId::new(1),
        username: "ana".into(),
        full_name: "Ana Li".into(),
        role: Role::Student,
        email: None,
        class_name: Some(class_name.into()),
        school_name: None,
    }
}

pub fn question(id: u64) -> Question {
    Question {
        id: intellitest_core::model::QuestionId::new(id),
        question_text: format!("Question {id}"),
        option_a: "A".into(),
        option_b: "B".into(),
        option_c: "C".into(),
        option_d: "D".into(),
        correct_answer: None,
        topic: None,
        difficulty_level: Difficulty::Medium,
        image_url: None,
    }
}

pub fn timed_test(id: u64, minutes: u32, questions: u64) -> Test {
    Test {
        id: TestId::new(id),
        name: format!("Test {id}"),
        description: None,
        duration_minutes: minutes,
        assigned_classes: Some("10A".into()),
        is_live: true,
        questions: (1..=questions).map(question).collect(),
    }
}

pub fn snapshot(test_id: u64, user: u64, status: ProgressStatus) -> ProgressSnapshot {
    ProgressSnapshot {
        user_id: UserId::new(user),
        user_name: format!("t{test_id}-student{user}"),
        class_name: Some("10A".into()),
        attempted_questions: 1,
        total_questions: 4,
        status,
    }
}
