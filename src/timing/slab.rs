//! Generational slab for timer nodes.
//!
//! Fixed capacity with an intrusive free list. Every slot carries a
//! generation counter that is bumped on free, so a handle minted for an
//! earlier occupant can be told apart from the current one.

use core::marker::PhantomData;
use core::num::NonZeroUsize;

/// Index into a slab, tagged by payload type to prevent cross-slab misuse.
// Manual Copy/Clone: derive would demand T: Copy, but the parameter is only a marker.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SlabIndex<T>(u32, PhantomData<T>);

impl<T> Copy for SlabIndex<T> {}

impl<T> Clone for SlabIndex<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> From<u32> for SlabIndex<T> {
    #[inline]
    fn from(idx: u32) -> Self {
        Self(idx, PhantomData)
    }
}

impl<T> From<SlabIndex<T>> for usize {
    #[inline]
    fn from(idx: SlabIndex<T>) -> Self {
        idx.0 as Self
    }
}

/// Timer node occupying a slab slot.
pub struct Node<T> {
    /// Payload; `Some` while armed, taken when the timer fires.
    pub payload: Option<T>,
    /// Generation at allocation time, for stale-handle rejection.
    pub generation: u32,
    /// Forward link in the owning wheel-slot list.
    pub next: Option<SlabIndex<T>>,
    /// Backward link in the owning wheel-slot list (`None` at the head).
    pub prev: Option<SlabIndex<T>>,
    /// Absolute deadline in wheel ticks.
    pub deadline: u64,
}

enum Entry<T> {
    Occupied(Node<T>),
    Free {
        next: Option<SlabIndex<T>>,
        generation: u32,
    },
}

/// Fixed-capacity slab with an intrusive free list.
pub struct Slab<T> {
    entries: Vec<Entry<T>>,
    free_head: Option<SlabIndex<T>>,
    occupied: usize,
}

impl<T> Slab<T> {
    /// Creates a slab with the given capacity, all slots free.
    ///
    /// # Panics
    ///
    /// Panics if `cap` exceeds `u32::MAX`.
    #[must_use]
    pub fn with_capacity(cap: NonZeroUsize) -> Self {
        let cap = cap.get();
        assert!(
            u32::try_from(cap).is_ok(),
            "slab capacity must fit in u32"
        );
        let entries = (0..cap)
            .map(|i| Entry::Free {
                next: (i + 1 < cap).then(|| SlabIndex::from((i + 1) as u32)),
                generation: 0,
            })
            .collect();
        Self {
            entries,
            free_head: Some(SlabIndex::from(0u32)),
            occupied: 0,
        }
    }

    /// Allocates a node, returning its index and a mutable reference, or
    /// `None` when every slot is occupied.
    pub fn alloc(&mut self, payload: T, deadline: u64) -> Option<(SlabIndex<T>, &mut Node<T>)> {
        let idx = self.free_head?;
        let (next_free, generation) = match &self.entries[usize::from(idx)] {
            Entry::Free { next, generation } => (*next, *generation),
            Entry::Occupied(_) => unreachable!("free_head must point to a free slot"),
        };
        self.free_head = next_free;
        self.occupied += 1;

        self.entries[usize::from(idx)] = Entry::Occupied(Node {
            payload: Some(payload),
            generation,
            next: None,
            prev: None,
            deadline,
        });

        match &mut self.entries[usize::from(idx)] {
            Entry::Occupied(node) => Some((idx, node)),
            Entry::Free { .. } => None,
        }
    }

    /// Frees a node, bumping the slot generation so outstanding handles to
    /// it become stale. Returns the freed generation, or `None` if the slot
    /// was already free.
    pub fn free(&mut self, idx: SlabIndex<T>) -> Option<u32> {
        let generation = match &self.entries[usize::from(idx)] {
            Entry::Occupied(node) => node.generation,
            Entry::Free { .. } => return None,
        };
        self.entries[usize::from(idx)] = Entry::Free {
            next: self.free_head,
            generation: generation.wrapping_add(1),
        };
        self.free_head = Some(idx);
        self.occupied -= 1;
        Some(generation)
    }

    /// Returns the node at `idx` if occupied.
    #[must_use]
    pub fn get(&self, idx: SlabIndex<T>) -> Option<&Node<T>> {
        match &self.entries[usize::from(idx)] {
            Entry::Occupied(node) => Some(node),
            Entry::Free { .. } => None,
        }
    }

    /// Returns the node at `idx` mutably if occupied.
    pub fn get_mut(&mut self, idx: SlabIndex<T>) -> Option<&mut Node<T>> {
        match &mut self.entries[usize::from(idx)] {
            Entry::Occupied(node) => Some(node),
            Entry::Free { .. } => None,
        }
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.occupied
    }

    /// Whether no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }
}
