//! # querygen — Conjunctive-Query Generalization
//!
//! Explains the individuals a classifier labeled positive by generalizing
//! their knowledge-graph descriptions into small conjunctive-query patterns.
//!
//! ## Design Principles
//!
//! 1. **Owned values**: every `ConjunctiveQuery` owns its labels and matrices;
//!    every merge returns a fresh query
//! 2. **Trait at the seam**: `MergeOperator` is the contract between the
//!    scheduler and the generalization strategy
//! 3. **Pure core**: no I/O inside model, merge or scheduler; adapters in
//!    `individual` and `export` sit at the edges
//!
//! ## Quick Start
//!
//! ```rust
//! use querygen::{ConjunctiveQuery, Scheduler, SchedulerConfig};
//!
//! # fn example() -> querygen::Result<()> {
//! let queries = vec![
//!     ConjunctiveQuery::single(["Seven", "Digit"]),
//!     ConjunctiveQuery::single(["One", "Digit"]),
//! ];
//! let outcome = Scheduler::new(SchedulerConfig::default()).run(queries)?;
//! for explanation in &outcome.explanations {
//!     println!("{}", querygen::export::to_sparql(explanation, "http://example.org/onto#"));
//! }
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Merge Strategies
//!
//! | Strategy | Module | Description |
//! |----------|--------|-------------|
//! | `Greedy` | `merge::matching` | Injective node alignment, one node per node of the smaller query (default) |
//! | `Exact` | `merge::product` | Tensor-product graph, pruned and minimized |
//!
//! ## Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `parallel` | Compute the initial all-pairs dissimilarity matrix with rayon |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod index;
pub mod merge;
pub mod scheduler;
pub mod individual;
pub mod export;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    AdjacencyMatrix, ConceptSet, ConjunctiveQuery, RoleDegrees,
    dissimilarity,
};

// ============================================================================
// Re-exports: Merge + scheduling
// ============================================================================

pub use index::IndexedMaxHeap;
pub use merge::{MergeOperator, MergeStrategy, greedy_matching, qlcs};
pub use scheduler::{
    Scheduler, SchedulerConfig, ScheduleOutcome, ScheduleStats,
    kgrules_h,
};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Heap key decrease for item {id}: current {current}, requested {requested}")]
    KeyDecrease { id: usize, current: u32, requested: u32 },

    #[error("Item {0} is not in the heap")]
    NotInHeap(usize),

    #[error("Invalid heap input: {0}")]
    InvalidHeap(String),

    #[error("Node {index} out of range for query with {node_count} nodes")]
    NodeOutOfRange { index: usize, node_count: usize },

    #[error("Merge error: {0}")]
    Merge(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
