//! Timing primitives.
//!
//! Typed time quantities, clock capabilities, and a hashed timing wheel with
//! a boxed-callback [`Scheduler`] on top. The wheel is per-thread and
//! shared-nothing; time only moves when the caller advances it, which is
//! what makes the gate wrappers deterministic to test.

mod clock;
mod scheduler;
mod slab;
mod time;
mod wheel;

pub use clock::{timestamp, Clock, ManualClock, SystemClock};
pub use scheduler::{Scheduler, Task, TaskHandle};
pub use time::{
    Duration, Micros, Millis, NonZeroDuration, Seconds, TimeUnit, Timestamp,
};
pub use wheel::{PowerOfTwo, TimerHandle, Wheel, WheelConfig, WheelError, WheelStats};
