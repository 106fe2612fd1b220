//! Hashed timing wheel with O(1) schedule/cancel and bounded per-advance work.
//!
//! Single-level, power-of-two slot count; per-thread, shared-nothing. Due
//! timers are streamed to a callback during [`Wheel::advance`] so advancing
//! never allocates. Timers whose deadline lies beyond one rotation stay
//! parked in their slot and are re-linked until the deadline tick arrives.

use core::num::NonZeroUsize;

use thiserror::Error;

use crate::timing::slab::{Slab, SlabIndex};
use crate::timing::time::{Duration, Millis, NonZeroDuration, TimeUnit, Timestamp};
use crate::trace::trace;

/// Errors surfaced by wheel operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WheelError {
    /// Every timer slot is armed; the wheel was configured too small.
    #[error("timer capacity exhausted")]
    Capacity,
}

/// Handle to an armed timer.
///
/// Carries the slot generation observed at arm time, so cancelling a timer
/// that has already fired (or whose slot was reused) is a harmless no-op.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle<T> {
    idx: SlabIndex<T>,
    generation: u32,
}

/// Witness type for power-of-two slot counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerOfTwo(usize);

impl PowerOfTwo {
    /// Accepts `val` if it is a non-zero power of two.
    #[must_use]
    pub const fn new(val: usize) -> Option<Self> {
        if val.is_power_of_two() {
            Some(Self(val))
        } else {
            None
        }
    }

    /// Returns the witnessed value.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// Wheel configuration (immutable after construction).
#[derive(Debug, Clone, Copy)]
pub struct WheelConfig<U: TimeUnit = Millis> {
    /// Number of wheel slots; more slots spread deadlines thinner.
    pub slots: PowerOfTwo,
    /// Physical size of one wheel tick.
    pub tick: NonZeroDuration<U>,
    /// Maximum number of concurrently armed timers.
    pub capacity: NonZeroUsize,
}

impl WheelConfig<Millis> {
    const DEFAULT_SLOTS: usize = 256;
    const DEFAULT_CAPACITY: usize = 1024;
}

impl Default for WheelConfig<Millis> {
    /// 256 slots, 1 ms tick, 1024 timers.
    ///
    /// # Panics
    ///
    /// Never panics; the defaults are statically valid.
    fn default() -> Self {
        Self {
            slots: PowerOfTwo::new(Self::DEFAULT_SLOTS).expect("default slot count is valid"),
            tick: NonZeroDuration::from_u64(1).expect("default tick is non-zero"),
            capacity: NonZeroUsize::new(Self::DEFAULT_CAPACITY).expect("default capacity is valid"),
        }
    }
}

impl<U: TimeUnit> WheelConfig<U> {
    /// Builder-style setter for the slot count.
    #[must_use]
    pub const fn with_slots(mut self, slots: PowerOfTwo) -> Self {
        self.slots = slots;
        self
    }

    /// Builder-style setter for the tick size.
    #[must_use]
    pub const fn with_tick(mut self, tick: NonZeroDuration<U>) -> Self {
        self.tick = tick;
        self
    }

    /// Builder-style setter for the timer capacity.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.capacity = capacity;
        self
    }
}

/// Operational gauges maintained by the wheel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WheelStats {
    /// Most timers fired by a single `advance` call.
    pub max_fired_per_advance: usize,
    /// Deepest slot list walked so far.
    pub max_slot_depth: usize,
    /// Most timers concurrently armed so far.
    pub high_water: usize,
}

/// Hashed timing wheel.
pub struct Wheel<T, U: TimeUnit = Millis> {
    /// Head of the timer list per slot.
    slots: Vec<Option<SlabIndex<T>>>,
    slab: Slab<T>,
    mask: usize,
    tick: NonZeroDuration<U>,
    /// Last tick the wheel was advanced to.
    cursor: u64,
    stats: WheelStats,
}

impl<T, U: TimeUnit> Wheel<T, U> {
    /// Creates a new wheel from `config`.
    #[must_use]
    pub fn new(config: WheelConfig<U>) -> Self {
        let slots = config.slots.get();
        Self {
            slots: vec![None; slots],
            slab: Slab::with_capacity(config.capacity),
            mask: slots - 1,
            tick: config.tick,
            cursor: 0,
            stats: WheelStats::default(),
        }
    }

    /// Converts a physical timestamp into wheel ticks.
    #[inline]
    fn tick_of(&self, at: Timestamp<U>) -> u64 {
        at.as_u64() / self.tick.get()
    }

    /// Arms a timer `delay` from the wheel's current position.
    ///
    /// A zero delay fires on the next tick; the wheel never fires within the
    /// tick that armed the timer. Sub-tick delays round up so a timer can
    /// never fire early.
    ///
    /// # Errors
    ///
    /// Returns [`WheelError::Capacity`] when every timer slot is armed.
    pub fn schedule(&mut self, delay: Duration<U>, payload: T) -> Result<TimerHandle<T>, WheelError> {
        let delay_ticks = delay.as_u64().div_ceil(self.tick.get()).max(1);
        let deadline = self.cursor + delay_ticks;
        let slot = (deadline as usize) & self.mask;
        let head = self.slots[slot];

        let (idx, generation) = {
            let (idx, node) = self
                .slab
                .alloc(payload, deadline)
                .ok_or(WheelError::Capacity)?;
            node.next = head;
            (idx, node.generation)
        };
        if let Some(head_idx) = head {
            if let Some(head_node) = self.slab.get_mut(head_idx) {
                head_node.prev = Some(idx);
            }
        }
        self.slots[slot] = Some(idx);
        self.stats.high_water = self.stats.high_water.max(self.slab.len());

        trace!(deadline, slot, unit = U::NAME, "armed timer");
        Ok(TimerHandle { idx, generation })
    }

    /// Disarms a timer.
    ///
    /// Returns `false` if the handle is stale: the timer already fired, was
    /// already cancelled, or its slot has been reused.
    pub fn cancel(&mut self, handle: &TimerHandle<T>) -> bool {
        match self.slab.get(handle.idx) {
            Some(node) if node.generation == handle.generation => {}
            _ => return false,
        }

        let idx = handle.idx;
        if let Some(node) = self.slab.get_mut(idx) {
            let next = node.next;
            let prev = node.prev;
            let deadline = node.deadline;
            if let Some(p) = prev {
                if let Some(prev_node) = self.slab.get_mut(p) {
                    prev_node.next = next;
                }
            } else {
                // Head of its slot list.
                let slot = (deadline as usize) & self.mask;
                self.slots[slot] = next;
            }
            if let Some(n) = next {
                if let Some(next_node) = self.slab.get_mut(n) {
                    next_node.prev = prev;
                }
            }
            trace!(deadline, "disarmed timer");
        }

        self.slab.free(idx).is_some()
    }

    /// Advances the wheel to `now` and streams each due timer's payload to
    /// `on_fire`.
    ///
    /// Advancing to a time at or before the current position is a no-op.
    pub fn advance(&mut self, now: Timestamp<U>, mut on_fire: impl FnMut(T)) {
        let now_tick = self.tick_of(now);
        if now_tick <= self.cursor {
            return;
        }
        if self.slab.is_empty() {
            // Nothing armed; skip the slot scans.
            self.cursor = now_tick;
            return;
        }
        let mut fired_total = 0;
        let mut tick = self.cursor + 1;
        while tick <= now_tick {
            let slot = (tick as usize) & self.mask;
            let mut head = self.slots[slot];
            let mut parked_head: Option<SlabIndex<T>> = None;
            let mut slot_depth = 0;
            while let Some(idx) = head {
                slot_depth += 1;
                // Save the link before the node is freed or re-linked.
                let next = self.slab.get(idx).and_then(|node| node.next);
                let due = self
                    .slab
                    .get(idx)
                    .is_some_and(|node| node.deadline <= now_tick);

                if due {
                    if let Some(node) = self.slab.get_mut(idx) {
                        if let Some(payload) = node.payload.take() {
                            on_fire(payload);
                            fired_total += 1;
                        }
                    }
                    self.slab.free(idx);
                } else {
                    // Not due for at least one more rotation; park it.
                    if let Some(node) = self.slab.get_mut(idx) {
                        node.next = parked_head;
                        node.prev = None;
                    }
                    if let Some(parked) = parked_head {
                        if let Some(parked_node) = self.slab.get_mut(parked) {
                            parked_node.prev = Some(idx);
                        }
                    }
                    parked_head = Some(idx);
                }
                head = next;
            }
            self.slots[slot] = parked_head;
            self.stats.max_slot_depth = self.stats.max_slot_depth.max(slot_depth);
            tick += 1;
        }
        self.cursor = now_tick;
        self.stats.max_fired_per_advance = self.stats.max_fired_per_advance.max(fired_total);
        trace!(now_tick, fired = fired_total, "advanced wheel");
    }

    /// Number of currently armed timers.
    #[must_use]
    pub fn armed(&self) -> usize {
        self.slab.len()
    }

    /// Returns the operational gauges.
    #[must_use]
    pub fn stats(&self) -> WheelStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wheel_u32(capacity: usize) -> Wheel<u32, Millis> {
        let config = WheelConfig::default()
            .with_slots(PowerOfTwo::new(8).unwrap())
            .with_capacity(NonZeroUsize::new(capacity).unwrap());
        Wheel::new(config)
    }

    fn at(ms: u64) -> Timestamp<Millis> {
        Timestamp::new(ms)
    }

    fn ms(ms: u64) -> Duration<Millis> {
        Duration::from_millis(ms)
    }

    #[test]
    fn fires_due_timers() {
        let mut w = wheel_u32(4);
        w.schedule(ms(0), 10).unwrap();
        w.schedule(ms(2), 20).unwrap();

        let mut fired = Vec::new();
        w.advance(at(1), |v| fired.push(v));
        assert_eq!(fired, [10], "zero delay fires on the next tick");

        fired.clear();
        w.advance(at(3), |v| fired.push(v));
        assert_eq!(fired, [20]);
        assert_eq!(w.armed(), 0);
    }

    #[test]
    fn zero_delay_does_not_fire_within_scheduling_tick() {
        let mut w = wheel_u32(2);
        w.advance(at(5), |_| {});
        w.schedule(ms(0), 1).unwrap();

        let mut fired = Vec::new();
        w.advance(at(5), |v| fired.push(v));
        assert!(fired.is_empty(), "same-tick advance must not fire");

        w.advance(at(6), |v| fired.push(v));
        assert_eq!(fired, [1]);
    }

    #[test]
    fn cancel_prevents_fire() {
        let mut w = wheel_u32(2);
        let handle = w.schedule(ms(1), 42).unwrap();
        assert!(w.cancel(&handle));
        assert!(!w.cancel(&handle), "cancel is not idempotent");

        let mut fired = Vec::new();
        w.advance(at(2), |v| fired.push(v));
        assert!(fired.is_empty());
    }

    #[test]
    fn stale_handle_rejected_after_fire() {
        let mut w = wheel_u32(1);
        let h1 = w.schedule(ms(0), 1).unwrap();
        w.advance(at(1), |_| {});

        let h2 = w.schedule(ms(0), 2).unwrap();
        assert!(!w.cancel(&h1), "slot was reused, old handle is stale");
        assert!(w.cancel(&h2));
    }

    #[test]
    fn capacity_exhaustion_returns_error() {
        let mut w = wheel_u32(1);
        w.schedule(ms(0), 1).unwrap();
        assert_eq!(w.schedule(ms(0), 2).unwrap_err(), WheelError::Capacity);
    }

    #[test]
    fn pending_kept_until_due() {
        let mut w = wheel_u32(2);
        w.schedule(ms(3), 99).unwrap();

        let mut fired = Vec::new();
        w.advance(at(2), |v| fired.push(v));
        assert!(fired.is_empty(), "not due yet");

        w.advance(at(3), |v| fired.push(v));
        assert_eq!(fired, [99]);
    }

    #[test]
    fn jump_ahead_fires_intermediate() {
        let mut w = wheel_u32(3);
        w.schedule(ms(1), 1).unwrap();
        w.schedule(ms(3), 3).unwrap();

        let mut fired = Vec::new();
        w.advance(at(10), |v| fired.push(v));
        fired.sort_unstable();
        assert_eq!(fired, [1, 3]);
    }

    #[test]
    fn beyond_rotation_delay_parks_until_due() {
        // 8 slots; a 20-tick delay wraps the wheel more than twice.
        let mut w = wheel_u32(2);
        w.schedule(ms(20), 7).unwrap();

        let mut fired = Vec::new();
        w.advance(at(19), |v| fired.push(v));
        assert!(fired.is_empty(), "parked across rotations");

        w.advance(at(20), |v| fired.push(v));
        assert_eq!(fired, [7]);
    }

    #[test]
    fn sub_tick_delay_rounds_up() {
        let config = WheelConfig::default()
            .with_slots(PowerOfTwo::new(8).unwrap())
            .with_tick(NonZeroDuration::from_u64(10).unwrap())
            .with_capacity(NonZeroUsize::new(2).unwrap());
        let mut w: Wheel<u32, Millis> = Wheel::new(config);

        w.schedule(ms(15), 5).unwrap();
        let mut fired = Vec::new();
        w.advance(at(10), |v| fired.push(v));
        assert!(fired.is_empty(), "15 ms rounds up to two 10 ms ticks");
        w.advance(at(20), |v| fired.push(v));
        assert_eq!(fired, [5]);
    }

    #[test]
    fn stats_track_high_water_and_firing() {
        let mut w = wheel_u32(4);
        w.schedule(ms(1), 1).unwrap();
        w.schedule(ms(1), 2).unwrap();
        w.schedule(ms(1), 3).unwrap();
        assert_eq!(w.stats().high_water, 3);

        w.advance(at(1), |_| {});
        assert_eq!(w.stats().max_fired_per_advance, 3);
        assert!(w.stats().max_slot_depth >= 3);
        assert_eq!(w.armed(), 0);
    }
}
