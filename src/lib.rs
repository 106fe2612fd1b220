//! Pacing utilities for cooperative, single-threaded hosts.
//!
//! Two independent halves share this crate:
//!
//! - [`Progression`]: finite arithmetic progressions of integers.
//! - [`Debounce`] and [`Throttle`]: time-gated wrappers around callbacks,
//!   driven by the [`timing`] module's wheel-backed [`Scheduler`] and
//!   injectable [`Clock`](timing::Clock), so tests advance time explicitly
//!   instead of sleeping on the wall clock.
//!
//! # Example
//!
//! ```
//! use pacer::timing::{ManualClock, Scheduler, Timestamp};
//! use pacer::{Debounce, Duration, Progression, Throttle};
//!
//! // Progressions.
//! let squares: Vec<_> = Progression::stepped(0, 10, 3).map(|v| v * v).collect();
//! assert_eq!(squares, [0, 9, 36, 81]);
//!
//! // Debounce a bursty callback.
//! let mut timers = Scheduler::default();
//! let mut gate = Debounce::new(Duration::from_millis(20), |v: u32| {
//!     assert_eq!(v, 3, "only the burst's last arguments arrive");
//! });
//! for v in 1..=3 {
//!     gate.call(&mut timers, v).unwrap();
//! }
//! timers.advance_to(Timestamp::new(20));
//!
//! // Throttle against a deterministic clock.
//! let clock = ManualClock::new(0);
//! let mut gate = Throttle::new(Duration::from_millis(100), |_: u32| {});
//! gate.call(&clock, 1); // anchors the window
//! clock.advance(100);
//! gate.call(&clock, 2); // fires
//! ```

pub mod gate;
pub mod progression;
pub mod timing;

mod trace;

pub use gate::{Debounce, Throttle};
pub use progression::Progression;
pub use timing::{timestamp, Duration, Scheduler};
pub use trace::init_tracing;
