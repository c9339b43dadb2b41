//! # Query Dissimilarity — a fast edit-distance heuristic
//!
//! Estimates how much two conjunctive queries differ without aligning
//! them. Each node of one query is charged the cost of its cheapest
//! counterpart in the other:
//!
//! ```text
//! cost(c1, c2) = |labels(c1) − labels(c2)|
//!              + Σ shared relation r:   max(out_r(c1) − out_r(c2), 0)
//!                                     + max(in_r(c1)  − in_r(c2),  0)
//!              + Σ relation r only in c1's query:  out_r(c1) + in_r(c1)
//! ```
//!
//! Summing the per-node minima in both directions approximates a two-sided
//! edit distance. It is not a metric: the triangle inequality does not hold.

use super::ConjunctiveQuery;

/// Two-sided dissimilarity of `q1` and `q2`. Zero for a query and itself.
pub fn dissimilarity(q1: &ConjunctiveQuery, q2: &ConjunctiveQuery) -> u32 {
    let (larger, smaller) = if q1.node_count() < q2.node_count() { (q2, q1) } else { (q1, q2) };
    directional(larger, smaller) + directional(smaller, larger)
}

/// Sum over every node of `from` of its cheapest match in `to`.
fn directional(from: &ConjunctiveQuery, to: &ConjunctiveQuery) -> u32 {
    (0..from.node_count())
        .map(|c1| (0..to.node_count()).map(|c2| node_cost(from, c1, to, c2)).min().unwrap_or(0))
        .sum()
}

fn node_cost(from: &ConjunctiveQuery, c1: usize, to: &ConjunctiveQuery, c2: usize) -> u32 {
    let labels = from.concepts()[c1].difference(&to.concepts()[c2]).count() as u32;
    let structure: u32 = from
        .roles()
        .keys()
        .map(|role| {
            let (out1, in1) = (from.out_degree(role, c1), from.in_degree(role, c1));
            if to.has_role(role) {
                out1.saturating_sub(to.out_degree(role, c2)) + in1.saturating_sub(to.in_degree(role, c2))
            } else {
                out1 + in1
            }
        })
        .sum();
    labels + structure
}
