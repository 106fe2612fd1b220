//! Time-gated callable wrappers.
//!
//! [`Debounce`] defers a callback until a burst of calls has gone quiet;
//! [`Throttle`] lets at most one call per window through and drops the rest.
//! Both forward the triggering call's arguments unchanged. Debounce needs a
//! [`Scheduler`](crate::timing::Scheduler) to park its deferred invocation;
//! throttle only needs a [`Clock`](crate::timing::Clock).

mod debounce;
mod throttle;

pub use debounce::Debounce;
pub use throttle::Throttle;
