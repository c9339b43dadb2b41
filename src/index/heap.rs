//! Indexed binary max-heap with in-place key increase.
//!
//! Items are identified by a dense id in `0..n`. Alongside the heap array
//! a `position` array maps every id to the slot currently holding it, so
//! `increase_key` can find an item in O(1) and sift it toward the root in
//! O(log n). The two arrays are updated together by every operation.
//!
//! Equal keys resolve toward the smaller id, which keeps `pop_max`
//! deterministic and makes an id-ordered list whose first entry carries
//! the largest key a valid heap as-is.

use crate::{Error, Result};

/// Slot value for ids that have been popped.
const REMOVED: usize = usize::MAX;

/// Heap order: larger key first, then smaller id.
#[inline]
fn outranks(a: (u32, usize), b: (u32, usize)) -> bool {
    a.0 > b.0 || (a.0 == b.0 && a.1 < b.1)
}

/// Array-backed max-heap keyed by an external item id.
#[derive(Debug, Clone)]
pub struct IndexedMaxHeap {
    heap: Vec<(u32, usize)>,
    position: Vec<usize>,
}

impl IndexedMaxHeap {
    /// Build a heap from `(key, id)` pairs.
    ///
    /// Ids must be exactly `0..items.len()`, each appearing once. When
    /// `is_heap` is true the list is trusted to already be in heap order
    /// and no sifting is done.
    pub fn build(items: Vec<(u32, usize)>, is_heap: bool) -> Result<Self> {
        let n = items.len();
        let mut position = vec![REMOVED; n];
        for (slot, &(_, id)) in items.iter().enumerate() {
            if id >= n {
                return Err(Error::InvalidHeap(format!("id {id} outside 0..{n}")));
            }
            if position[id] != REMOVED {
                return Err(Error::InvalidHeap(format!("duplicate id {id}")));
            }
            position[id] = slot;
        }

        let mut heap = Self { heap: items, position };
        if !is_heap {
            for slot in (0..n / 2).rev() {
                heap.sift_down(slot);
            }
        }
        Ok(heap)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Whether `id` is still waiting in the heap.
    pub fn contains(&self, id: usize) -> bool {
        self.position.get(id).is_some_and(|&slot| slot != REMOVED)
    }

    /// Current key of a live item.
    pub fn key_of(&self, id: usize) -> Option<u32> {
        self.contains(id).then(|| self.heap[self.position[id]].0)
    }

    pub fn peek(&self) -> Option<(u32, usize)> {
        self.heap.first().copied()
    }

    /// Remove and return the entry with the largest key.
    pub fn pop_max(&mut self) -> Option<(u32, usize)> {
        let last = self.heap.pop()?;
        if self.heap.is_empty() {
            self.position[last.1] = REMOVED;
            return Some(last);
        }
        let top = std::mem::replace(&mut self.heap[0], last);
        self.position[top.1] = REMOVED;
        self.position[last.1] = 0;
        self.sift_down(0);
        Some(top)
    }

    /// Raise the key of `id` to `new_key`.
    ///
    /// Fails without touching the heap if `new_key` is below the current key.
    pub fn increase_key(&mut self, id: usize, new_key: u32) -> Result<()> {
        if !self.contains(id) {
            return Err(Error::NotInHeap(id));
        }
        let slot = self.position[id];
        let current = self.heap[slot].0;
        if new_key < current {
            return Err(Error::KeyDecrease { id, current, requested: new_key });
        }
        self.heap[slot].0 = new_key;
        self.sift_up(slot);
        Ok(())
    }

    /// Move the entry at `slot` toward the root until its parent is larger.
    fn sift_up(&mut self, mut slot: usize) {
        let item = self.heap[slot];
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !outranks(item, self.heap[parent]) {
                break;
            }
            self.heap[slot] = self.heap[parent];
            self.position[self.heap[slot].1] = slot;
            slot = parent;
        }
        self.heap[slot] = item;
        self.position[item.1] = slot;
    }

    /// Move the entry at `slot` toward the leaves until both children are smaller.
    fn sift_down(&mut self, mut slot: usize) {
        let n = self.heap.len();
        let item = self.heap[slot];
        loop {
            let left = 2 * slot + 1;
            if left >= n {
                break;
            }
            let right = left + 1;
            let child = if right < n && outranks(self.heap[right], self.heap[left]) { right } else { left };
            if !outranks(self.heap[child], item) {
                break;
            }
            self.heap[slot] = self.heap[child];
            self.position[self.heap[slot].1] = slot;
            slot = child;
        }
        self.heap[slot] = item;
        self.position[item.1] = slot;
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        for (slot, &(_, id)) in self.heap.iter().enumerate() {
            assert_eq!(self.position[id], slot, "position out of sync for id {id}");
            if slot > 0 {
                assert!(outranks(self.heap[(slot - 1) / 2], self.heap[slot]), "heap order broken at {slot}");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
