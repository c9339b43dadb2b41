//! # Hierarchical Merge Scheduler (KGRules-H)
//!
//! Agglomerative clustering over conjunctive queries. Each step merges the
//! two most similar active queries; the merged query is emitted as an
//! explanation and takes the place of its inputs.
//!
//! ```text
//! D ← all-pairs dissimilarity (diagonal = SENTINEL)
//! repeat up to n − 1 times while ≥ 2 queries are active:
//!     (k, l) ← argmin D, k > l
//!     q ← merge(q[k], q[l])
//!     if threshold > 0 and |q| > threshold:    ← KGRules-HT
//!         drop q[k] and q[l], emit nothing
//!     else:
//!         emit q; drop q[k]; q[l] ← q; refresh D[l, ·]
//! ```
//!
//! The threshold rejects generalizations that grow too large: both inputs
//! leave the pool instead of seeding an ever-bigger pattern.

pub mod matrix;

use serde::{Deserialize, Serialize};

use crate::merge::{MergeOperator, MergeStrategy};
use crate::model::ConjunctiveQuery;
use crate::Result;

pub use matrix::{DissimilarityMatrix, SENTINEL};

// ============================================================================
// Configuration
// ============================================================================

/// Scheduler settings.
///
/// `threshold <= 0` runs plain KGRules-H; a positive value enables the HT
/// rejection rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub strategy: MergeStrategy,
    pub threshold: i64,
}

impl SchedulerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether a merge result of `node_count` nodes is discarded.
    pub fn rejects(&self, node_count: usize) -> bool {
        rejects(self.threshold, node_count)
    }
}

fn rejects(threshold: i64, node_count: usize) -> bool {
    threshold > 0 && node_count as u64 > threshold as u64
}

// ============================================================================
// Outcome
// ============================================================================

/// Counters from one scheduler run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleStats {
    /// Loop iterations executed.
    pub iterations: usize,
    /// Merges kept as explanations.
    pub merges: usize,
    /// Merges discarded by the threshold rule.
    pub rejected: usize,
}

/// Explanations in emission order, plus run counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleOutcome {
    pub explanations: Vec<ConjunctiveQuery>,
    pub stats: ScheduleStats,
}

// ============================================================================
// Scheduler
// ============================================================================

/// Runs KGRules-H with a fixed merge operator and threshold.
pub struct Scheduler<M: MergeOperator = MergeStrategy> {
    merge: M,
    threshold: i64,
}

impl Scheduler<MergeStrategy> {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { merge: config.strategy, threshold: config.threshold }
    }
}

impl Default for Scheduler<MergeStrategy> {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl<M: MergeOperator> Scheduler<M> {
    /// Scheduler with a caller-supplied merge operator.
    pub fn with_operator(merge: M, threshold: i64) -> Self {
        Self { merge, threshold }
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    /// Cluster `queries`, one per explained individual.
    ///
    /// A merge failure aborts the run: skipping a pair would leave the
    /// matrix out of step with the active list.
    pub fn run(&self, queries: Vec<ConjunctiveQuery>) -> Result<ScheduleOutcome> {
        let n = queries.len();
        tracing::info!(queries = n, threshold = self.threshold, "starting hierarchical merge");

        let mut active = queries;
        let mut diss = DissimilarityMatrix::build(&active);
        let mut explanations = Vec::new();
        let mut stats = ScheduleStats::default();

        for _ in 0..n.saturating_sub(1) {
            if active.len() < 2 {
                break;
            }
            let Some((row, col)) = diss.argmin() else { break };
            let (k, l) = if row > col { (row, col) } else { (col, row) };
            stats.iterations += 1;

            let distance = diss.get(k, l);
            let merged = self.merge.merge(&active[k], &active[l])?;

            if rejects(self.threshold, merged.node_count()) {
                tracing::debug!(k, l, distance, nodes = merged.node_count(), "merge rejected by threshold");
                for index in [k, l] {
                    active.remove(index);
                    diss.remove(index)?;
                }
                stats.rejected += 1;
                continue;
            }

            tracing::debug!(k, l, distance, nodes = merged.node_count(), "merge accepted");
            active.remove(k);
            diss.remove(k)?;
            active[l] = merged.clone();
            diss.refresh(l, &active);
            explanations.push(merged);
            stats.merges += 1;
        }

        tracing::info!(
            explanations = explanations.len(),
            rejected = stats.rejected,
            remaining = active.len(),
            "hierarchical merge finished"
        );
        Ok(ScheduleOutcome { explanations, stats })
    }
}

/// KGRules-H over `queries`: the explanations in emission order.
pub fn kgrules_h<M: MergeOperator>(
    queries: Vec<ConjunctiveQuery>,
    merge: M,
    threshold: i64,
) -> Result<Vec<ConjunctiveQuery>> {
    Ok(Scheduler::with_operator(merge, threshold).run(queries)?.explanations)
}

// ============================================================================
// Tests
// ============================================================================
