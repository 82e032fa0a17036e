//! Live progress of students on a live test, refreshed on a fixed cadence.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use intellitest_core::Clock;
use intellitest_core::model::{ProgressCounts, ProgressSnapshot, Test, TestId};

use crate::api::RemoteApi;
use crate::error::{ApiError, ScheduleError};
use crate::schedule::{FirstTick, Schedule};

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Everything the monitor shows for one test at one refresh.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonitorBoard {
    pub test_id: Option<TestId>,
    pub snapshots: Vec<ProgressSnapshot>,
    pub counts: ProgressCounts,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl MonitorBoard {
    /// Selected but not fetched yet.
    #[must_use]
    pub fn pending(test_id: TestId) -> Self {
        Self {
            test_id: Some(test_id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn from_snapshots(
        test_id: TestId,
        snapshots: Vec<ProgressSnapshot>,
        refreshed_at: DateTime<Utc>,
    ) -> Self {
        let counts = ProgressCounts::from_snapshots(&snapshots);
        Self {
            test_id: Some(test_id),
            snapshots,
            counts,
            refreshed_at: Some(refreshed_at),
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.refreshed_at.is_some()
    }
}

pub struct MonitoringService {
    clock: Clock,
    api: Arc<dyn RemoteApi>,
}

impl MonitoringService {
    #[must_use]
    pub fn new(clock: Clock, api: Arc<dyn RemoteApi>) -> Self {
        Self { clock, api }
    }

    /// Tests that can be monitored right now.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the list cannot be fetched.
    pub async fn live_tests(&self) -> Result<Vec<Test>, ApiError> {
        self.api.live_tests().await
    }

    /// Current snapshots for one test. Failures are logged and read as "no students".
    pub async fn refresh(&self, test_id: TestId) -> Vec<ProgressSnapshot> {
        match self.api.test_progress(test_id).await {
            Ok(snapshots) => {
                debug!(test_id = test_id.value(), students = snapshots.len(), "progress refreshed");
                snapshots
            }
            Err(err) => {
                warn!(test_id = test_id.value(), error = %err, "progress refresh failed");
                Vec::new()
            }
        }
    }

    pub async fn board(&self, test_id: TestId) -> MonitorBoard {
        let snapshots = self.refresh(test_id).await;
        MonitorBoard::from_snapshots(test_id, snapshots, self.clock.now())
    }
}

//
// ─── POLLER ────────────────────────────────────────────────────────────────────
//

/// Keeps a [`MonitorBoard`] fresh for whichever test is selected.
///
/// Selecting a test cancels the previous schedule before the new one starts, and every
/// schedule carries a generation number; a board fetched under an older generation is
/// never published.
pub struct MonitoringPoller {
    service: Arc<MonitoringService>,
    runtime: Handle,
    interval: Duration,
    generation: Arc<AtomicU64>,
    board: Arc<watch::Sender<MonitorBoard>>,
    schedule: Mutex<Option<Schedule>>,
}

impl MonitoringPoller {
    /// # Errors
    ///
    /// Returns `ScheduleError::NoRuntime` outside a tokio runtime.
    pub fn new(service: Arc<MonitoringService>, interval: Duration) -> Result<Self, ScheduleError> {
        let runtime = Handle::try_current().map_err(|_| ScheduleError::NoRuntime)?;
        Ok(Self::new_on(runtime, service, interval))
    }

    #[must_use]
    pub fn new_on(runtime: Handle, service: Arc<MonitoringService>, interval: Duration) -> Self {
        let (board, _) = watch::channel(MonitorBoard::default());
        Self {
            service,
            runtime,
            interval,
            generation: Arc::new(AtomicU64::new(0)),
            board: Arc::new(board),
            schedule: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<MonitorBoard> {
        self.board.subscribe()
    }

    #[must_use]
    pub fn board(&self) -> MonitorBoard {
        self.board.borrow().clone()
    }

    #[must_use]
    pub fn selected(&self) -> Option<TestId> {
        self.board.borrow().test_id
    }

    /// Switch to `test_id`: fetch now, then every interval.
    pub fn select(&self, test_id: TestId) {
        let mut slot = self.schedule.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.take() {
            previous.cancel();
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.board.send_replace(MonitorBoard::pending(test_id));
        info!(test_id = test_id.value(), generation, "monitoring test");

        let service = Arc::clone(&self.service);
        let current = Arc::clone(&self.generation);
        let board = Arc::clone(&self.board);
        *slot = Some(Schedule::spawn_on(
            &self.runtime,
            self.interval,
            FirstTick::Immediate,
            move || {
                let service = Arc::clone(&service);
                let current = Arc::clone(&current);
                let board = Arc::clone(&board);
                async move {
                    if current.load(Ordering::SeqCst) != generation {
                        return ControlFlow::Break(());
                    }
                    let next = service.board(test_id).await;
                    let published = board.send_if_modified(|shown| {
                        if current.load(Ordering::SeqCst) != generation {
                            return false;
                        }
                        *shown = next;
                        true
                    });
                    if published {
                        ControlFlow::Continue(())
                    } else {
                        debug!(test_id = test_id.value(), generation, "discarding stale board");
                        ControlFlow::Break(())
                    }
                }
            },
        ));
    }

    /// Stop polling. The last board stays visible.
    pub fn stop(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let previous = self
            .schedule
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(previous) = previous {
            previous.cancel();
        }
    }
}

impl Drop for MonitoringPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
