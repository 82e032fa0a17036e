use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::AttemptError;
use crate::model::{
    AnswerOption, QuestionId, Submission, SubmissionReceipt, Test, completion_percent,
};

//
// ─── PHASES AND EVENTS ─────────────────────────────────────────────────────────
//

/// Why a submission was not acknowledged. Mirrors the client's API error categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Network,
    Auth,
    Validation(String),
    NotFound,
    Server(u16),
}

impl FailureReason {
    /// Learner-facing explanation.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Network => "Could not reach the server. Your answers are kept.".to_string(),
            Self::Auth => "Your session has expired. Sign in again to submit.".to_string(),
            Self::Validation(detail) => format!("The server rejected the submission: {detail}"),
            Self::NotFound => "This test is no longer available.".to_string(),
            Self::Server(status) => format!("The server failed with status {status}."),
        }
    }
}

/// Lifecycle of one attempt. Only moves forward; `Failed` can re-enter `Submitting` via retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptPhase {
    NotStarted,
    InProgress,
    Submitting,
    Submitted,
    Failed(FailureReason),
}

impl AttemptPhase {
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted)
    }
}

/// What started a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    /// Learner confirmed the submit dialog.
    Manual,
    /// Countdown reached zero.
    Forced,
}

/// Result of a one-second clock tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not in progress; the tick changed nothing.
    Idle,
    Running { remaining_secs: u32 },
    /// Time ran out on this tick. The attempt is now `Submitting` with this payload.
    Expired(Submission),
}

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// One learner's pass at one test.
///
/// Pure state machine: no clock, no I/O. The caller feeds ticks and selections and carries
/// the payload returned by [`Attempt::begin_submit`] to the server, then reports the outcome
/// with [`Attempt::resolve_submit`].
pub struct Attempt {
    test: Arc<Test>,
    phase: AttemptPhase,
    answers: HashMap<QuestionId, AnswerOption>,
    remaining_secs: u32,
    started_at: Option<DateTime<Utc>>,
    trigger: Option<SubmitTrigger>,
    payload: Option<Submission>,
    receipt: Option<SubmissionReceipt>,
}

impl Attempt {
    #[must_use]
    pub fn new(test: Test) -> Self {
        Self::from_shared(Arc::new(test))
    }

    #[must_use]
    pub fn from_shared(test: Arc<Test>) -> Self {
        let remaining_secs = test.duration_secs();
        Self {
            test,
            phase: AttemptPhase::NotStarted,
            answers: HashMap::new(),
            remaining_secs,
            started_at: None,
            trigger: None,
            payload: None,
            receipt: None,
        }
    }

    #[must_use]
    pub fn test(&self) -> &Test {
        &self.test
    }

    #[must_use]
    pub fn shared_test(&self) -> Arc<Test> {
        Arc::clone(&self.test)
    }

    #[must_use]
    pub fn phase(&self) -> &AttemptPhase {
        &self.phase
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.test.duration_secs()
    }

    /// Remaining share of the allowed time in `0.0..=1.0` (0 for zero-length tests).
    #[must_use]
    pub fn time_fraction_left(&self) -> f64 {
        let duration = self.duration_secs();
        if duration == 0 {
            return 0.0;
        }
        f64::from(self.remaining_secs) / f64::from(duration)
    }

    #[must_use]
    pub fn answers(&self) -> &HashMap<QuestionId, AnswerOption> {
        &self.answers
    }

    #[must_use]
    pub fn selected(&self, question_id: QuestionId) -> Option<AnswerOption> {
        self.answers.get(&question_id).copied()
    }

    #[must_use]
    pub fn attempted_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.test.question_count()
    }

    #[must_use]
    pub fn completion_percent(&self) -> f64 {
        completion_percent(self.attempted_count(), self.total_questions())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.attempted_count() >= self.total_questions()
    }

    /// How the current or last submission was triggered.
    #[must_use]
    pub fn trigger(&self) -> Option<SubmitTrigger> {
        self.trigger
    }

    /// Payload captured when submission began; reused verbatim on retry.
    #[must_use]
    pub fn payload(&self) -> Option<&Submission> {
        self.payload.as_ref()
    }

    #[must_use]
    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    /// `NotStarted → InProgress`. Sets the countdown to the full duration.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::AlreadyStarted` if the attempt left `NotStarted` before.
    pub fn start(&mut self, started_at: DateTime<Utc>) -> Result<(), AttemptError> {
        if self.phase != AttemptPhase::NotStarted {
            return Err(AttemptError::AlreadyStarted);
        }
        self.remaining_secs = self.test.duration_secs();
        self.started_at = Some(started_at);
        self.phase = AttemptPhase::InProgress;
        Ok(())
    }

    /// Advances the countdown by one second.
    ///
    /// Only the tick that reaches zero returns `Expired`; later ticks are `Idle` because the
    /// attempt has already left `InProgress`. A zero-length test expires on its first tick.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.phase.is_in_progress() {
            return TickOutcome::Idle;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return TickOutcome::Running {
                remaining_secs: self.remaining_secs,
            };
        }
        match self.begin_submit(SubmitTrigger::Forced) {
            Some(payload) => TickOutcome::Expired(payload),
            None => TickOutcome::Idle,
        }
    }

    /// Records the learner's choice, replacing any earlier choice for the same question.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NotInProgress` outside `InProgress` and
    /// `AttemptError::UnknownQuestion` for ids that are not part of the test.
    pub fn select(
        &mut self,
        question_id: QuestionId,
        option: AnswerOption,
    ) -> Result<(), AttemptError> {
        if !self.phase.is_in_progress() {
            return Err(AttemptError::NotInProgress);
        }
        if !self.test.contains_question(question_id) {
            return Err(AttemptError::UnknownQuestion(question_id));
        }
        self.answers.insert(question_id, option);
        Ok(())
    }

    /// Starts or retries a submission.
    ///
    /// From `InProgress` this captures the payload and moves to `Submitting`. From `Failed`
    /// it re-enters `Submitting` with the payload captured the first time. In every other
    /// phase it returns `None`, so repeated triggers have no effect.
    pub fn begin_submit(&mut self, trigger: SubmitTrigger) -> Option<Submission> {
        match self.phase {
            AttemptPhase::InProgress => {
                let payload = Submission::from_answers(&self.test, &self.answers);
                self.payload = Some(payload.clone());
                self.trigger = Some(trigger);
                self.phase = AttemptPhase::Submitting;
                Some(payload)
            }
            AttemptPhase::Failed(_) => {
                let payload = self.payload.clone()?;
                self.phase = AttemptPhase::Submitting;
                Some(payload)
            }
            AttemptPhase::NotStarted | AttemptPhase::Submitting | AttemptPhase::Submitted => None,
        }
    }

    /// Resends the captured payload after a failure. `None` unless the attempt is `Failed`.
    pub fn retry(&mut self) -> Option<Submission> {
        if !matches!(self.phase, AttemptPhase::Failed(_)) {
            return None;
        }
        self.begin_submit(SubmitTrigger::Manual)
    }

    /// Applies the server's answer to the in-flight submission.
    ///
    /// Returns `false` (and changes nothing) when no submission is in flight.
    pub fn resolve_submit(&mut self, result: Result<SubmissionReceipt, FailureReason>) -> bool {
        if self.phase != AttemptPhase::Submitting {
            return false;
        }
        match result {
            Ok(receipt) => {
                self.receipt = Some(receipt);
                self.phase = AttemptPhase::Submitted;
            }
            Err(reason) => self.phase = AttemptPhase::Failed(reason),
        }
        true
    }
}

impl fmt::Debug for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attempt")
            .field("test_id", &self.test.id)
            .field("phase", &self.phase)
            .field("answers_len", &self.answers.len())
            .field("remaining_secs", &self.remaining_secs)
            .field("trigger", &self.trigger)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
