use std::collections::HashMap;
use std::future::Future;
use std::ops::ControlFlow;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info};

use intellitest_core::model::{
    AnswerOption, QuestionId, Submission, SubmissionReceipt, Test, TestId, completion_percent,
};
use intellitest_core::{Attempt, AttemptError, AttemptPhase, SubmitTrigger, TickOutcome};

use super::service::{SubmitOutcome, TestSessionService};
use crate::error::{ScheduleError, SessionError};
use crate::schedule::{FirstTick, Schedule};

const TICK: Duration = Duration::from_secs(1);

//
// ─── VIEW ──────────────────────────────────────────────────────────────────────
//

/// Read-only snapshot of an attempt, published after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptView {
    pub test_id: TestId,
    pub phase: AttemptPhase,
    pub remaining_secs: u32,
    pub duration_secs: u32,
    pub attempted: usize,
    pub total: usize,
    pub answers: HashMap<QuestionId, AnswerOption>,
    pub trigger: Option<SubmitTrigger>,
    pub receipt: Option<SubmissionReceipt>,
}

impl AttemptView {
    #[must_use]
    pub fn from_attempt(attempt: &Attempt) -> Self {
        Self {
            test_id: attempt.test().id,
            phase: attempt.phase().clone(),
            remaining_secs: attempt.remaining_secs(),
            duration_secs: attempt.duration_secs(),
            attempted: attempt.attempted_count(),
            total: attempt.total_questions(),
            answers: attempt.answers().clone(),
            trigger: attempt.trigger(),
            receipt: attempt.receipt().cloned(),
        }
    }

    #[must_use]
    pub fn selected(&self, question_id: QuestionId) -> Option<AnswerOption> {
        self.answers.get(&question_id).copied()
    }

    #[must_use]
    pub fn completion_percent(&self) -> f64 {
        completion_percent(self.attempted, self.total)
    }

    #[must_use]
    pub fn time_fraction_left(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        f64::from(self.remaining_secs) / f64::from(self.duration_secs)
    }
}

//
// ─── SHARED STATE ──────────────────────────────────────────────────────────────
//

struct Shared {
    attempt: Mutex<Attempt>,
    stopped: AtomicBool,
    view: watch::Sender<AttemptView>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Attempt> {
        self.attempt.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    fn publish(&self, attempt: &Attempt) {
        self.view.send_replace(AttemptView::from_attempt(attempt));
    }

    /// Sends the payload and applies the answer unless the driver stopped meanwhile.
    async fn deliver(
        self: Arc<Self>,
        service: Arc<TestSessionService>,
        payload: Submission,
    ) -> SubmitOutcome {
        let result = service.send(&payload).await;
        if self.is_stopped() {
            debug!(test_id = payload.test_id.value(), "dropping late submission response");
            return SubmitOutcome::Superseded;
        }
        let mut attempt = self.lock();
        attempt.resolve_submit(result.clone());
        self.publish(&attempt);
        match result {
            Ok(receipt) => SubmitOutcome::Accepted(receipt),
            Err(reason) => SubmitOutcome::Rejected(reason),
        }
    }
}

//
// ─── DRIVER ────────────────────────────────────────────────────────────────────
//

/// Runs one attempt against the wall clock.
///
/// A one-second countdown ticks the attempt; the tick that reaches zero sends the forced
/// submission. Manual submit and retry go through the same non-reentrant state machine,
/// so at most one request is in flight. Dropping the driver stops it.
pub struct AttemptDriver {
    shared: Arc<Shared>,
    service: Arc<TestSessionService>,
    runtime: Handle,
    countdown: Mutex<Option<Schedule>>,
}

impl AttemptDriver {
    /// Start `attempt` and its countdown on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Schedule` outside a runtime and `SessionError::Attempt` if the
    /// attempt was already started.
    pub fn start(service: Arc<TestSessionService>, attempt: Attempt) -> Result<Self, SessionError> {
        let runtime = Handle::try_current().map_err(|_| ScheduleError::NoRuntime)?;
        Self::start_on(runtime, service, attempt)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Attempt` if the attempt was already started.
    pub fn start_on(
        runtime: Handle,
        service: Arc<TestSessionService>,
        mut attempt: Attempt,
    ) -> Result<Self, SessionError> {
        service.start(&mut attempt)?;
        info!(
            test_id = attempt.test().id.value(),
            remaining_secs = attempt.remaining_secs(),
            "attempt started"
        );

        let (view, _) = watch::channel(AttemptView::from_attempt(&attempt));
        let shared = Arc::new(Shared {
            attempt: Mutex::new(attempt),
            stopped: AtomicBool::new(false),
            view,
        });

        let countdown = Schedule::spawn_on(
            &runtime,
            TICK,
            FirstTick::AfterPeriod,
            countdown_task(Arc::clone(&shared), Arc::clone(&service), runtime.clone()),
        );

        Ok(Self {
            shared,
            service,
            runtime,
            countdown: Mutex::new(Some(countdown)),
        })
    }

    #[must_use]
    pub fn view(&self) -> AttemptView {
        self.shared.view.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AttemptView> {
        self.shared.view.subscribe()
    }

    #[must_use]
    pub fn test(&self) -> Arc<Test> {
        self.shared.lock().shared_test()
    }

    /// Record an answer.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` if the attempt is no longer in progress or the question is unknown.
    pub fn select(&self, question_id: QuestionId, option: AnswerOption) -> Result<(), AttemptError> {
        let mut attempt = self.shared.lock();
        attempt.select(question_id, option)?;
        self.shared.publish(&attempt);
        Ok(())
    }

    /// Submit on the learner's confirmation.
    pub async fn submit_manual(&self) -> SubmitOutcome {
        let payload = {
            let mut attempt = self.shared.lock();
            let payload = attempt.begin_submit(SubmitTrigger::Manual);
            if payload.is_some() {
                self.shared.publish(&attempt);
            }
            payload
        };
        match payload {
            Some(payload) => self.dispatch(payload).await,
            None => SubmitOutcome::Ignored,
        }
    }

    /// Resend the captured payload after a failed submission.
    pub async fn retry(&self) -> SubmitOutcome {
        let payload = {
            let mut attempt = self.shared.lock();
            let payload = attempt.retry();
            if payload.is_some() {
                self.shared.publish(&attempt);
            }
            payload
        };
        match payload {
            Some(payload) => self.dispatch(payload).await,
            None => SubmitOutcome::Ignored,
        }
    }

    // The request runs as its own task so it completes even if the caller goes away.
    async fn dispatch(&self, payload: Submission) -> SubmitOutcome {
        if self.shared.is_stopped() {
            return SubmitOutcome::Superseded;
        }
        let task = Arc::clone(&self.shared).deliver(Arc::clone(&self.service), payload);
        self.runtime
            .spawn(task)
            .await
            .unwrap_or(SubmitOutcome::Superseded)
    }

    /// Cancel the countdown and ignore any response still on its way.
    pub fn stop(&self) {
        if self.shared.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        let countdown = self
            .countdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(countdown) = countdown {
            countdown.cancel();
        }
        debug!(test_id = self.view().test_id.value(), "attempt driver stopped");
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.shared.is_stopped()
    }
}

impl Drop for AttemptDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn countdown_task(
    shared: Arc<Shared>,
    service: Arc<TestSessionService>,
    runtime: Handle,
) -> impl FnMut() -> Pin<Box<dyn Future<Output = ControlFlow<()>> + Send>> + Send + 'static
{
    move || {
        let shared = Arc::clone(&shared);
        let service = Arc::clone(&service);
        let runtime = runtime.clone();
        Box::pin(async move {
            if shared.is_stopped() {
                return ControlFlow::Break(());
            }
            let outcome = {
                let mut attempt = shared.lock();
                let outcome = attempt.tick();
                shared.publish(&attempt);
                outcome
            };
            match outcome {
                TickOutcome::Running { .. } => ControlFlow::Continue(()),
                TickOutcome::Expired(payload) => {
                    info!(
                        test_id = payload.test_id.value(),
                        attempted = payload.attempted(),
                        "time is up; submitting"
                    );
                    runtime.spawn(shared.deliver(service, payload));
                    ControlFlow::Break(())
                }
                TickOutcome::Idle => ControlFlow::Break(()),
            }
        })
    }
}
