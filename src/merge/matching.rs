//! Approximate generalization via greedy node alignment.
//!
//! Rather than simplifying the full product graph, pick a one-to-one
//! correspondence between the nodes of the two queries and keep only what
//! both sides of each matched pair agree on.
//!
//! # Algorithm
//!
//! ```text
//! gain(i, j)   = |labels(q1[i]) ∩ labels(q2[j])|
//! open set     = every product node; (0, 0) keyed by its gain, the rest by 0
//! loop:
//!     pop the open pair (i, j) with the highest key
//!     commit it; close every pair in row i or column j
//!     for each relation, each open product neighbor of (i, j): gain += 1
//!     raise the neighbors' keys to their gains
//! ```
//!
//! Expansion starts at the roots and grows along shared edges, Prim-style.
//! Closing rows and columns makes the matching injective, so every node of
//! the smaller query ends up paired with a distinct node of the larger one.

use std::collections::BTreeMap;

use hashbrown::HashSet;
use smallvec::SmallVec;

use super::qlcs;
use crate::index::IndexedMaxHeap;
use crate::model::{ConceptSet, ConjunctiveQuery};
use crate::Result;

type Neighbors = SmallVec<[usize; 8]>;

/// Anti-unify `q1` and `q2` through a greedy injective node matching.
///
/// The result has one node per node of the smaller input, in that query's
/// order. Each node keeps the labels both matched nodes share; each
/// relation present in both inputs keeps the edges both sides agree on.
///
/// Pairs with equal gain are taken in ascending product index, i.e. the
/// lower `q1` node first, then the lower `q2` node. This follows the
/// `IndexedMaxHeap` tie order, which is also what expands the roots first.
/// Reversing the tie order changes which of several tied candidates is
/// aligned.
pub fn greedy_matching(q1: &ConjunctiveQuery, q2: &ConjunctiveQuery) -> Result<ConjunctiveQuery> {
    let (q1, q2) = if q1.node_count() < q2.node_count() { (q2, q1) } else { (q1, q2) };
    let (n1, n2) = (q1.node_count(), q2.node_count());
    if n2 == 0 {
        return Ok(ConjunctiveQuery::empty());
    }

    let product = qlcs(q1, q2)?;
    let total = product.node_count();

    // Undirected neighbors of every product node, one list per relation.
    let neighbors_by_role: Vec<Vec<Neighbors>> = (0..total)
        .map(|k| {
            product
                .roles()
                .values()
                .map(|m| (0..total).filter(|&o| m.get(k, o) || m.get(o, k)).collect::<Neighbors>())
                .collect()
        })
        .collect();

    let mut gain: Vec<u32> = product.concepts().iter().map(|c| c.len() as u32).collect();
    let mut closed = vec![false; total];
    let mut matching: Vec<(usize, usize)> = Vec::with_capacity(n2);

    let seed = (0..total).map(|k| (if k == 0 { gain[0] } else { 0 }, k)).collect();
    let mut open = IndexedMaxHeap::build(seed, true)?;

    while let Some((_, node)) = open.pop_max() {
        if closed[node] {
            continue;
        }
        let (i, j) = (node / n2, node % n2);
        matching.push((i, j));
        for k in 0..n1 {
            closed[k * n2 + j] = true;
        }
        for k in 0..n2 {
            closed[i * n2 + k] = true;
        }

        let mut frontier = HashSet::new();
        for neighbors in &neighbors_by_role[node] {
            for &neighbor in neighbors.iter().filter(|&&nb| !closed[nb]) {
                gain[neighbor] += 1;
                frontier.insert(neighbor);
            }
        }
        for neighbor in frontier {
            open.increase_key(neighbor, gain[neighbor])?;
        }
    }

    matching.sort_by_key(|&(_, j)| j);
    let picked: Vec<usize> = matching.iter().map(|&(i, _)| i).collect();
    tracing::trace!(?matching, "greedy matching committed");

    let concepts: Vec<ConceptSet> = matching
        .iter()
        .map(|&(i, j)| q1.concepts()[i].intersection(&q2.concepts()[j]).cloned().collect::<ConceptSet>())
        .collect();

    let mut roles = BTreeMap::new();
    for (role, m1) in q1.roles() {
        if let Some(m2) = q2.role(role) {
            roles.insert(role.clone(), m1.select(&picked).and(m2)?);
        }
    }

    ConjunctiveQuery::new(concepts, roles)
}

// ============================================================================
// Tests
// ============================================================================
