//! Trailing-edge debounce: collapse a burst of calls into one invocation.

use core::marker::PhantomData;
use std::cell::RefCell;
use std::rc::Rc;

use crate::timing::{Duration, Millis, Scheduler, TaskHandle, WheelError};
use crate::trace::trace;

/// Debounced wrapper around a callback.
///
/// Each [`call`](Debounce::call) supersedes the previous one: the pending
/// invocation (if any) is cancelled and a new one is scheduled `delay` after
/// this call, carrying this call's arguments. The callback therefore runs
/// exactly once per burst, after the burst has been quiet for `delay`, with
/// the arguments of the burst's last call. If the wrapper is never called,
/// the callback never runs.
///
/// There is no external flush or cancel; a pending invocation is only ever
/// displaced by a newer call.
///
/// # Example
///
/// ```
/// use pacer::timing::{Scheduler, Timestamp};
/// use pacer::{Debounce, Duration};
///
/// let mut timers = Scheduler::default();
/// let mut saves = Debounce::new(Duration::from_millis(30), |name: &str| {
///     println!("saving {name}");
/// });
///
/// saves.call(&mut timers, "draft-1").unwrap();
/// saves.call(&mut timers, "draft-2").unwrap();
///
/// // Only "draft-2" is saved, 30 ms after the second call.
/// timers.advance_to(Timestamp::new(30));
/// ```
pub struct Debounce<A, F: FnMut(A)> {
    callback: Rc<RefCell<F>>,
    delay: Duration<Millis>,
    pending: Option<TaskHandle>,
    _args: PhantomData<fn(A)>,
}

impl<A, F> Debounce<A, F>
where
    A: 'static,
    F: FnMut(A) + 'static,
{
    /// Wraps `callback` so invocations are delayed by `delay` and bursts
    /// collapse to the final call.
    #[must_use]
    pub fn new(delay: Duration<Millis>, callback: F) -> Self {
        Self {
            callback: Rc::new(RefCell::new(callback)),
            delay,
            pending: None,
            _args: PhantomData,
        }
    }

    /// Supersedes any pending invocation and schedules the callback to run
    /// with `args` once `delay` has passed without another call.
    ///
    /// # Errors
    ///
    /// Returns [`WheelError::Capacity`] if `timers` is full.
    pub fn call(&mut self, timers: &mut Scheduler, args: A) -> Result<(), WheelError> {
        if let Some(handle) = self.pending.take() {
            // A handle to an invocation that already ran is stale; cancelling
            // it is a no-op, so no fired/pending bookkeeping is needed here.
            if timers.cancel(&handle) {
                trace!("debounce call displaced a pending invocation");
            }
        }
        let callback = Rc::clone(&self.callback);
        let handle = timers.schedule_after(self.delay, move || (callback.borrow_mut())(args))?;
        self.pending = Some(handle);
        Ok(())
    }

    /// The configured quiet period.
    #[must_use]
    pub fn delay(&self) -> Duration<Millis> {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::Timestamp;

    fn ms(ms: u64) -> Duration<Millis> {
        Duration::from_millis(ms)
    }

    fn at(ms: u64) -> Timestamp<Millis> {
        Timestamp::new(ms)
    }

    #[test]
    fn burst_collapses_to_last_call() {
        let mut timers = Scheduler::default();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let mut gate = Debounce::new(ms(30), move |v: u32| sink.borrow_mut().push(v));

        // Calls at t=0, 10, 20; only the t=20 arguments survive.
        gate.call(&mut timers, 1).unwrap();
        timers.advance_to(at(10));
        gate.call(&mut timers, 2).unwrap();
        timers.advance_to(at(20));
        gate.call(&mut timers, 3).unwrap();

        timers.advance_to(at(49));
        assert!(seen.borrow().is_empty(), "still within the quiet period");

        timers.advance_to(at(50));
        assert_eq!(*seen.borrow(), [3], "fires 30 ms after the last call");

        timers.advance_to(at(200));
        assert_eq!(*seen.borrow(), [3], "fires exactly once");
    }

    #[test]
    fn no_calls_means_no_invocation() {
        let mut timers = Scheduler::default();
        let seen = Rc::new(RefCell::new(Vec::<u32>::new()));

        let sink = Rc::clone(&seen);
        let _gate = Debounce::new(ms(5), move |v: u32| sink.borrow_mut().push(v));

        timers.advance_to(at(100));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn lone_call_fires_after_delay() {
        let mut timers = Scheduler::default();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let mut gate = Debounce::new(ms(10), move |v: &str| sink.borrow_mut().push(v));

        gate.call(&mut timers, "only").unwrap();
        timers.advance_to(at(9));
        assert!(seen.borrow().is_empty());
        timers.advance_to(at(10));
        assert_eq!(*seen.borrow(), ["only"]);
    }

    #[test]
    fn reusable_after_firing() {
        let mut timers = Scheduler::default();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let mut gate = Debounce::new(ms(10), move |v: u32| sink.borrow_mut().push(v));

        gate.call(&mut timers, 1).unwrap();
        timers.advance_to(at(10));
        assert_eq!(*seen.borrow(), [1]);

        // A second burst after the first fired; the stale pending handle
        // must not confuse the wrapper.
        timers.advance_to(at(40));
        gate.call(&mut timers, 2).unwrap();
        timers.advance_to(at(45));
        gate.call(&mut timers, 3).unwrap();
        timers.advance_to(at(55));
        assert_eq!(*seen.borrow(), [1, 3]);
    }

    #[test]
    fn zero_delay_still_defers_to_next_tick() {
        let mut timers = Scheduler::default();
        timers.advance_to(at(5));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let mut gate = Debounce::new(ms(0), move |v: u32| sink.borrow_mut().push(v));

        gate.call(&mut timers, 1).unwrap();
        assert!(seen.borrow().is_empty(), "never synchronous");
        timers.advance_to(at(6));
        assert_eq!(*seen.borrow(), [1]);
    }
}
