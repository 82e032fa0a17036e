//! Fixed-cadence background work tied to the lifetime of a handle.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::error::ScheduleError;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// When the first run happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstTick {
    Immediate,
    AfterPeriod,
}

/// A task that runs every `period` until it returns `ControlFlow::Break`, is cancelled,
/// or the `Schedule` is dropped.
///
/// Runs never overlap: the next one waits for the previous future to finish.
#[derive(Debug)]
pub struct Schedule {
    handle: JoinHandle<()>,
}

impl Schedule {
    /// Spawn onto the runtime of the calling thread.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::NoRuntime` outside a tokio runtime.
    pub fn spawn<F, Fut>(period: Duration, first: FirstTick, task: F) -> Result<Self, ScheduleError>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| ScheduleError::NoRuntime)?;
        Ok(Self::spawn_on(&runtime, period, first, task))
    }

    pub fn spawn_on<F, Fut>(runtime: &Handle, period: Duration, first: FirstTick, mut task: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let handle = runtime.spawn(async move {
            let start = match first {
                FirstTick::Immediate => Instant::now(),
                FirstTick::AfterPeriod => Instant::now() + period,
            };
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if task().await.is_break() {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Stop future runs and abort the one in flight, if any.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Schedule {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
