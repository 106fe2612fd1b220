//! Deferred-execution scheduler: boxed callbacks over the timing wheel.
//!
//! This is the host facility the time-gated wrappers in [`crate::gate`]
//! consume: schedule a callback to run after a delay, cancel a pending one,
//! and advance time to run whatever became due.

use crate::timing::time::{Duration, Millis, TimeUnit, Timestamp};
use crate::timing::wheel::{TimerHandle, Wheel, WheelConfig, WheelError};
use crate::trace::debug;

/// A deferred callback.
pub type Task = Box<dyn FnOnce()>;

/// Handle to a scheduled task.
pub type TaskHandle = TimerHandle<Task>;

/// Deadline-driven task scheduler.
///
/// Callers advance the scheduler before scheduling, so delays are measured
/// from the current time. That is the usual cooperative event-loop shape:
/// read the clock, advance, then react.
pub struct Scheduler<U: TimeUnit = Millis> {
    wheel: Wheel<Task, U>,
}

impl<U: TimeUnit> Scheduler<U> {
    /// Creates a scheduler over a wheel built from `config`.
    #[must_use]
    pub fn new(config: WheelConfig<U>) -> Self {
        Self {
            wheel: Wheel::new(config),
        }
    }

    /// Schedules `task` to run once `delay` has elapsed.
    ///
    /// A zero delay runs the task on the next tick, never synchronously.
    ///
    /// # Errors
    ///
    /// Returns [`WheelError::Capacity`] when the scheduler is full.
    pub fn schedule_after(
        &mut self,
        delay: Duration<U>,
        task: impl FnOnce() + 'static,
    ) -> Result<TaskHandle, WheelError> {
        self.wheel.schedule(delay, Box::new(task))
    }

    /// Cancels a pending task.
    ///
    /// Returns `false` if the task already ran or was already cancelled.
    pub fn cancel(&mut self, handle: &TaskHandle) -> bool {
        self.wheel.cancel(handle)
    }

    /// Advances to `now`, running every task that became due, each exactly
    /// once. Advancing to a time at or before the current position is a
    /// no-op.
    pub fn advance_to(&mut self, now: Timestamp<U>) {
        self.wheel.advance(now, |task| task());
        debug!(now = now.as_u64(), unit = U::NAME, "scheduler advanced");
    }

    /// Number of tasks currently pending.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.wheel.armed()
    }
}

impl Default for Scheduler<Millis> {
    /// Millisecond scheduler with the default wheel configuration.
    fn default() -> Self {
        Self::new(WheelConfig::default())
    }
}
