//! Priority-queue primitives.
//!
//! The greedy matcher expands a product graph Prim-style, raising the
//! priority of frontier nodes as matches accumulate. `IndexedMaxHeap`
//! supports that pattern: O(n) build, O(log n) pop, O(log n) key increase.

pub mod heap;

pub use heap::IndexedMaxHeap;
