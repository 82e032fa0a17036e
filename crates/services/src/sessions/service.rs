use std::sync::Arc;

use tracing::{info, warn};

use intellitest_core::model::{Submission, SubmissionReceipt, TestId};
use intellitest_core::{Attempt, AttemptError, Clock, FailureReason, SubmitTrigger};

use crate::api::RemoteApi;
use crate::error::SessionError;

/// What happened to a submit request.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// A submission was already in flight or finished; nothing was sent.
    Ignored,
    Accepted(SubmissionReceipt),
    Rejected(FailureReason),
    /// The response arrived after the attempt was abandoned and was not applied.
    Superseded,
}

/// Loads tests and delivers submissions for attempts.
pub struct TestSessionService {
    clock: Clock,
    api: Arc<dyn RemoteApi>,
}

impl TestSessionService {
    #[must_use]
    pub fn new(clock: Clock, api: Arc<dyn RemoteApi>) -> Self {
        Self { clock, api }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Fetch the test with its questions and wrap it in a fresh attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Load` with the categorised API error.
    pub async fn open(&self, test_id: TestId) -> Result<Attempt, SessionError> {
        let test = self.api.get_test(test_id).await?;
        info!(
            test_id = test.id.value(),
            questions = test.question_count(),
            duration_minutes = test.duration_minutes,
            "test loaded"
        );
        Ok(Attempt::new(test))
    }

    /// Start the attempt at the service clock's current time.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::AlreadyStarted` if it was started before.
    pub fn start(&self, attempt: &mut Attempt) -> Result<(), AttemptError> {
        attempt.start(self.clock.now())
    }

    /// Send one payload and translate the result for the state machine.
    pub async fn send(&self, payload: &Submission) -> Result<SubmissionReceipt, FailureReason> {
        match self.api.submit(payload).await {
            Ok(receipt) => {
                info!(
                    test_id = payload.test_id.value(),
                    submission_id = receipt.id.value(),
                    attempted = payload.attempted(),
                    "submission accepted"
                );
                Ok(receipt)
            }
            Err(err) => {
                warn!(test_id = payload.test_id.value(), error = %err, "submission failed");
                Err(err.failure_reason())
            }
        }
    }

    /// Begin, send and resolve in one step. Used where no clock drives the attempt.
    ///
    /// From `Failed` this retries with the originally captured payload.
    pub async fn submit(&self, attempt: &mut Attempt, trigger: SubmitTrigger) -> SubmitOutcome {
        let Some(payload) = attempt.begin_submit(trigger) else {
            return SubmitOutcome::Ignored;
        };
        let result = self.send(&payload).await;
        attempt.resolve_submit(result.clone());
        match result {
            Ok(receipt) => SubmitOutcome::Accepted(receipt),
            Err(reason) => SubmitOutcome::Rejected(reason),
        }
    }
}
