//! Expiration Index Module
//!
//! Binary min-heap of cache entries ordered by logical expiration time.
//!
//! Entries live in an arena of slots; the heap array holds slot ids and every
//! swap rewrites the `heap_position` of both moved entries. That stored
//! position is what lets the key index reach an entry's heap node in O(1) and
//! repair it in O(log n).

use std::cmp::Ordering;
use std::time::Duration;

use crate::cache::entry::{CacheEntry, NOT_IN_HEAP};

/// Stable handle to an entry's arena slot.
pub type SlotId = usize;

// == Expiration Index ==
/// Position-aware min-heap over arena-allocated entries.
///
/// Ordering: an expired entry sorts before any live one; otherwise the
/// earlier `expire_at` wins. Expiry is judged against the `now` passed into
/// each operation, so the order is never stored, only re-evaluated.
#[derive(Debug)]
pub struct ExpirationIndex<K, V> {
    /// Arena of entries, `None` for free slots
    slots: Vec<Option<CacheEntry<K, V>>>,
    /// Reusable slot ids
    free: Vec<SlotId>,
    /// Heap array of slot ids
    heap: Vec<SlotId>,
}

impl<K, V> ExpirationIndex<K, V> {
    // == Constructor ==
    /// Creates an empty index with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            heap: Vec::with_capacity(capacity),
        }
    }

    /// Number of entries in the heap.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the entry stored in `slot`, if occupied.
    pub fn get(&self, slot: SlotId) -> Option<&CacheEntry<K, V>> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Mutable access to the entry in `slot`.
    ///
    /// Changing `expire_at` through this reference must be followed by
    /// [`fix`](Self::fix).
    pub fn get_mut(&mut self, slot: SlotId) -> Option<&mut CacheEntry<K, V>> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// The entry that would be popped next.
    pub fn peek(&self) -> Option<&CacheEntry<K, V>> {
        self.heap.first().map(|&slot| self.resident(slot))
    }

    // == Push ==
    /// Inserts an entry and returns its slot id. O(log n).
    pub fn push(&mut self, mut entry: CacheEntry<K, V>, now: Duration) -> SlotId {
        let position = self.heap.len();
        entry.heap_position = position;

        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                slot
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };

        self.heap.push(slot);
        self.sift_up(position, now);
        slot
    }

    // == Fix ==
    /// Restores heap order after the entry in `slot` changed its expiration.
    /// O(log n). Unknown slots are ignored.
    pub fn fix(&mut self, slot: SlotId, now: Duration) {
        let Some(position) = self.get(slot).map(|entry| entry.heap_position) else {
            return;
        };
        self.repair(position, now);
    }

    // == Remove At ==
    /// Detaches the entry at heap `position` and frees its slot. O(log n).
    ///
    /// The last heap element takes the vacated position and is re-sifted.
    pub fn remove_at(&mut self, position: usize, now: Duration) -> Option<CacheEntry<K, V>> {
        if position >= self.heap.len() {
            return None;
        }

        let last = self.heap.len() - 1;
        if position != last {
            self.swap(position, last);
        }

        let slot = self.heap.pop()?;
        let mut entry = self.slots[slot].take()?;
        self.free.push(slot);
        entry.heap_position = NOT_IN_HEAP;

        if position < self.heap.len() {
            self.repair(position, now);
        }

        Some(entry)
    }

    /// Detaches the entry stored in `slot`.
    pub fn remove(&mut self, slot: SlotId, now: Duration) -> Option<CacheEntry<K, V>> {
        let position = self.get(slot)?.heap_position;
        self.remove_at(position, now)
    }

    // == Pop ==
    /// Detaches the minimum entry: an expired one if any, else the earliest to expire.
    pub fn pop(&mut self, now: Duration) -> Option<CacheEntry<K, V>> {
        self.remove_at(0, now)
    }

    // == Ordering ==
    fn compare(&self, i: usize, j: usize, now: Duration) -> Ordering {
        let a = self.resident(self.heap[i]);
        let b = self.resident(self.heap[j]);
        match (a.is_expired(now), b.is_expired(now)) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a.expire_at.cmp(&b.expire_at),
        }
    }

    fn less(&self, i: usize, j: usize, now: Duration) -> bool {
        self.compare(i, j, now) == Ordering::Less
    }

    fn resident(&self, slot: SlotId) -> &CacheEntry<K, V> {
        match self.slots[slot].as_ref() {
            Some(entry) => entry,
            None => panic!("heap references vacant slot {slot}"),
        }
    }

    fn set_position(&mut self, position: usize) {
        let slot = self.heap[position];
        if let Some(entry) = self.slots[slot].as_mut() {
            entry.heap_position = position;
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.set_position(i);
        self.set_position(j);
    }

    fn repair(&mut self, position: usize, now: Duration) {
        if !self.sift_down(position, now) {
            self.sift_up(position, now);
        }
    }

    fn sift_up(&mut self, mut position: usize, now: Duration) {
        while position > 0 {
            let parent = (position - 1) / 2;
            if !self.less(position, parent, now) {
                break;
            }
            self.swap(position, parent);
            position = parent;
        }
    }

    /// Returns true if the element moved.
    fn sift_down(&mut self, start: usize, now: Duration) -> bool {
        let len = self.heap.len();
        let mut position = start;
        loop {
            let left = 2 * position + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.less(right, left, now) {
                right
            } else {
                left
            };
            if !self.less(child, position, now) {
                break;
            }
            self.swap(position, child);
            position = child;
        }
        position > start
    }

    /// Panics if any stored position is stale or heap order is broken.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self, now: Duration) {
        for (position, &slot) in self.heap.iter().enumerate() {
            assert_eq!(
                self.resident(slot).heap_position,
                position,
                "stale heap position for slot {slot}"
            );
            if position > 0 {
                let parent = (position - 1) / 2;
                assert!(
                    !self.less(position, parent, now),
                    "heap order broken at position {position}"
                );
            }
        }
        let occupied = self.slots.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(occupied, self.heap.len(), "arena and heap disagree");
    }
}
