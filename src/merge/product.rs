//! Exact generalization via the categorical (tensor) product graph.

use std::collections::BTreeMap;

use crate::model::{ConceptSet, ConjunctiveQuery};
use crate::Result;

/// Product graph of `q1` and `q2`.
///
/// Node `(i, j)` sits at index `i * q2.node_count() + j` and carries the
/// labels common to `q1[i]` and `q2[j]`. A relation survives only if both
/// inputs have it; its matrix is the Kronecker product of theirs, so
/// `(i1, j1) -> (i2, j2)` holds iff `i1 -> i2` in `q1` and `j1 -> j2` in `q2`.
///
/// The result has `|q1| × |q2|` nodes, most of them usually disconnected
/// from `(0, 0)`; callers prune it with `remove_non_connected` and
/// `approx_minimize`.
pub fn qlcs(q1: &ConjunctiveQuery, q2: &ConjunctiveQuery) -> Result<ConjunctiveQuery> {
    let concepts: Vec<ConceptSet> = q1
        .concepts()
        .iter()
        .flat_map(|c1| q2.concepts().iter().map(move |c2| c1.intersection(c2).cloned().collect::<ConceptSet>()))
        .collect();

    let roles: BTreeMap<_, _> = q1
        .roles()
        .iter()
        .filter_map(|(role, m1)| q2.role(role).map(|m2| (role.clone(), m1.kron(m2))))
        .collect();

    tracing::trace!(
        nodes = concepts.len(),
        roles = roles.len(),
        "built product graph"
    );
    ConjunctiveQuery::new(concepts, roles)
}
