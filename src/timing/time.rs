//! Typed time units and quantities.
//!
//! Durations and timestamps are raw `u64` counts tagged with a unit marker,
//! so milliseconds cannot be confused with seconds or wheel ticks.

use core::marker::PhantomData;
use core::num::NonZeroU64;

/// Marker trait for a time unit.
pub trait TimeUnit {
    /// Human-readable name for debugging/metrics.
    const NAME: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Micros {}
impl TimeUnit for Micros {
    const NAME: &'static str = "us";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Millis {}
impl TimeUnit for Millis {
    const NAME: &'static str = "ms";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Seconds {}
impl TimeUnit for Seconds {
    const NAME: &'static str = "s";
}

/// Strongly-typed duration in a given unit.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Duration<U: TimeUnit>(u64, PhantomData<U>);

// Manual `Clone`/`Copy` avoid the implicit `U: Copy` bound the derive would
// add; the marker `U` is never stored by value, so the copy is always valid.
impl<U: TimeUnit> Clone for Duration<U> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<U: TimeUnit> Copy for Duration<U> {}

impl<U: TimeUnit> Duration<U> {
    /// The zero-length duration.
    pub const ZERO: Self = Self(0, PhantomData);

    /// Creates a new duration.
    #[inline]
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value, PhantomData)
    }

    /// Returns the raw count.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl Duration<Millis> {
    /// Convenience constructor for milliseconds.
    #[inline]
    #[must_use]
    pub const fn from_millis(value: u64) -> Self {
        Self::new(value)
    }
}

/// Duration guaranteed non-zero, for quantities where zero is meaningless
/// (e.g. a wheel's tick size).
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct NonZeroDuration<U: TimeUnit>(NonZeroU64, PhantomData<U>);

// Manual `Clone`/`Copy` avoid the implicit `U: Copy` bound the derive would
// add; the marker `U` is never stored by value, so the copy is always valid.
impl<U: TimeUnit> Clone for NonZeroDuration<U> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<U: TimeUnit> Copy for NonZeroDuration<U> {}

impl<U: TimeUnit> NonZeroDuration<U> {
    /// Creates a new non-zero duration.
    #[inline]
    #[must_use]
    pub const fn new(value: NonZeroU64) -> Self {
        Self(value, PhantomData)
    }

    /// Creates a non-zero duration from a raw count, rejecting zero.
    #[inline]
    #[must_use]
    pub const fn from_u64(value: u64) -> Option<Self> {
        match NonZeroU64::new(value) {
            Some(v) => Some(Self(v, PhantomData)),
            None => None,
        }
    }

    /// Returns the raw count.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

/// Strongly-typed timestamp in a given unit.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Timestamp<U: TimeUnit>(u64, PhantomData<U>);

// Manual `Clone`/`Copy` avoid the implicit `U: Copy` bound the derive would
// add; the marker `U` is never stored by value, so the copy is always valid.
impl<U: TimeUnit> Clone for Timestamp<U> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<U: TimeUnit> Copy for Timestamp<U> {}

impl<U: TimeUnit> Timestamp<U> {
    /// Creates a new timestamp.
    #[inline]
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value, PhantomData)
    }

    /// Returns the raw count.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Elapsed time since `earlier`, clamped to zero if the clock ran
    /// backwards.
    #[inline]
    #[must_use]
    pub const fn saturating_since(self, earlier: Self) -> Duration<U> {
        Duration::new(self.0.saturating_sub(earlier.0))
    }
}

impl<U: TimeUnit> core::ops::Add<Duration<U>> for Timestamp<U> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Duration<U>) -> Self::Output {
        Timestamp::new(self.0 + rhs.0)
    }
}

impl<U: TimeUnit> core::ops::Sub<Duration<U>> for Timestamp<U> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Duration<U>) -> Self::Output {
        Timestamp::new(self.0 - rhs.0)
    }
}

impl<U: TimeUnit> core::ops::Sub for Timestamp<U> {
    type Output = Duration<U>;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Duration::new(self.0 - rhs.0)
    }
}
