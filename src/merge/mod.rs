//! # Merge Operators
//!
//! A merge takes two conjunctive queries and produces a query that
//! generalizes both: every individual matched by either input is matched
//! by the result.
//!
//! | Strategy | Builds | Cost |
//! |----------|--------|------|
//! | `Exact` | full product graph, then prune + minimize | O(\|q1\|² · \|q2\|²) nodes² before pruning |
//! | `Greedy` | one node per node of the smaller query | product graph scan, no minimization blow-up |
//!
//! Both strategies finish with `remove_non_connected` and `approx_minimize`.
//! Any `Fn(&ConjunctiveQuery, &ConjunctiveQuery) -> Result<ConjunctiveQuery>`
//! is also a `MergeOperator`, for callers that want their own pipeline.

pub mod product;
pub mod matching;

use serde::{Deserialize, Serialize};

use crate::model::ConjunctiveQuery;
use crate::Result;

pub use matching::greedy_matching;
pub use product::qlcs;

/// Something that generalizes two queries into one.
pub trait MergeOperator {
    fn merge(&self, q1: &ConjunctiveQuery, q2: &ConjunctiveQuery) -> Result<ConjunctiveQuery>;
}

impl<F> MergeOperator for F
where
    F: Fn(&ConjunctiveQuery, &ConjunctiveQuery) -> Result<ConjunctiveQuery>,
{
    fn merge(&self, q1: &ConjunctiveQuery, q2: &ConjunctiveQuery) -> Result<ConjunctiveQuery> {
        self(q1, q2)
    }
}

/// Built-in merge pipelines, selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// Tensor product, pruned to the root component and minimized.
    Exact,
    /// Greedy matching, pruned to the root component and minimized.
    #[default]
    Greedy,
}

impl MergeOperator for MergeStrategy {
    fn merge(&self, q1: &ConjunctiveQuery, q2: &ConjunctiveQuery) -> Result<ConjunctiveQuery> {
        let mut merged = match self {
            MergeStrategy::Exact => qlcs(q1, q2)?,
            MergeStrategy::Greedy => greedy_matching(q1, q2)?,
        };
        let raw = merged.node_count();
        merged.remove_non_connected().approx_minimize();
        tracing::debug!(
            strategy = ?self,
            inputs = ?(q1.node_count(), q2.node_count()),
            raw,
            kept = merged.node_count(),
            "merged query pair"
        );
        Ok(merged)
    }
}
