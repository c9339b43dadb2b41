//! Conjunctive query — a small labeled graph describing an individual.
//!
//! Nodes are dense indices `0..node_count`. Node 0 is the root: the
//! individual being described, or in a generalization, the variable that
//! stands for every individual the pattern matches. Each node carries a set
//! of concept labels; each named relation is a square boolean matrix.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::AdjacencyMatrix;
use crate::{Error, Result};

/// Concept labels attached to one node.
pub type ConceptSet = BTreeSet<String>;

/// Per-node in/out degree of one relation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleDegrees {
    /// Row sums: edges leaving each node.
    pub outgoing: Vec<u32>,
    /// Column sums: edges entering each node.
    pub incoming: Vec<u32>,
}

impl RoleDegrees {
    fn of(matrix: &AdjacencyMatrix) -> Self {
        let n = matrix.size();
        Self {
            outgoing: (0..n).map(|i| matrix.row_count(i)).collect(),
            incoming: (0..n).map(|j| matrix.col_count(j)).collect(),
        }
    }
}

/// A conjunctive query: concept labels per node plus one adjacency matrix per relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QueryParts", into = "QueryParts")]
pub struct ConjunctiveQuery {
    concepts: Vec<ConceptSet>,
    roles: BTreeMap<String, AdjacencyMatrix>,
    degrees: BTreeMap<String, RoleDegrees>,
}

/// Wire shape of a query: exactly the boundary fields, no derived state.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct QueryParts {
    concepts: Vec<ConceptSet>,
    #[serde(default)]
    roles: BTreeMap<String, AdjacencyMatrix>,
}

impl TryFrom<QueryParts> for ConjunctiveQuery {
    type Error = Error;

    fn try_from(parts: QueryParts) -> Result<Self> {
        Self::new(parts.concepts, parts.roles)
    }
}

impl From<ConjunctiveQuery> for QueryParts {
    fn from(query: ConjunctiveQuery) -> Self {
        Self { concepts: query.concepts, roles: query.roles }
    }
}

impl ConjunctiveQuery {
    /// Build a query, checking every matrix is `n × n` for `n = concepts.len()`.
    pub fn new(concepts: Vec<ConceptSet>, roles: BTreeMap<String, AdjacencyMatrix>) -> Result<Self> {
        let n = concepts.len();
        for (role, matrix) in &roles {
            if matrix.size() != n {
                return Err(Error::InvalidShape(format!(
                    "relation '{role}' is {0}x{0}, query has {n} nodes",
                    matrix.size()
                )));
            }
        }
        let degrees = roles.iter().map(|(r, m)| (r.clone(), RoleDegrees::of(m))).collect();
        Ok(Self { concepts, roles, degrees })
    }

    /// Query with no nodes.
    pub fn empty() -> Self {
        Self { concepts: Vec::new(), roles: BTreeMap::new(), degrees: BTreeMap::new() }
    }

    /// Single-node query with the given labels and no relations.
    pub fn single<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let concepts = vec![labels.into_iter().map(Into::into).collect()];
        Self { concepts, roles: BTreeMap::new(), degrees: BTreeMap::new() }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn node_count(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn concepts(&self) -> &[ConceptSet] {
        &self.concepts
    }

    pub fn concept(&self, node: usize) -> Option<&ConceptSet> {
        self.concepts.get(node)
    }

    pub fn roles(&self) -> &BTreeMap<String, AdjacencyMatrix> {
        &self.roles
    }

    pub fn role(&self, name: &str) -> Option<&AdjacencyMatrix> {
        self.roles.get(name)
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.roles.contains_key(name)
    }

    /// Whether `i -[role]-> j` holds. Unknown relations have no edges.
    pub fn has_edge(&self, role: &str, i: usize, j: usize) -> bool {
        self.roles.get(role).is_some_and(|m| m.get(i, j))
    }

    /// Edges of `role` leaving `node`; zero for an unknown relation.
    pub fn out_degree(&self, role: &str, node: usize) -> u32 {
        self.degrees.get(role).map_or(0, |d| d.outgoing[node])
    }

    /// Edges of `role` entering `node`; zero for an unknown relation.
    pub fn in_degree(&self, role: &str, node: usize) -> u32 {
        self.degrees.get(role).map_or(0, |d| d.incoming[node])
    }

    pub fn degrees(&self, role: &str) -> Option<&RoleDegrees> {
        self.degrees.get(role)
    }

    /// Total number of edges across all relations.
    pub fn edge_count(&self) -> usize {
        self.roles.values().map(AdjacencyMatrix::edge_count).sum()
    }

    // ========================================================================
    // Structural mutators
    // ========================================================================

    /// Remove node `i`. Every node above `i` shifts down by one, so callers
    /// deleting several nodes must go in descending index order.
    pub fn delete_node(&mut self, i: usize) -> Result<&mut Self> {
        if i >= self.node_count() {
            return Err(Error::NodeOutOfRange { index: i, node_count: self.node_count() });
        }
        self.remove_node(i);
        Ok(self)
    }

    fn remove_node(&mut self, i: usize) {
        let keep: Vec<usize> = (0..self.node_count()).filter(|&k| k != i).collect();
        self.concepts.remove(i);
        for matrix in self.roles.values_mut() {
            *matrix = matrix.select(&keep);
        }
        self.refresh_degrees();
    }

    fn refresh_degrees(&mut self) {
        self.degrees = self.roles.iter().map(|(r, m)| (r.clone(), RoleDegrees::of(m))).collect();
    }

    /// Keep only the component containing node 0, treating every relation
    /// as undirected.
    pub fn remove_non_connected(&mut self) -> &mut Self {
        let n = self.node_count();
        if n == 0 {
            return self;
        }

        let mut visited = vec![false; n];
        let mut stack = vec![0usize];
        while let Some(node) = stack.pop() {
            if visited[node] {
                continue;
            }
            visited[node] = true;
            for matrix in self.roles.values() {
                stack.extend((0..n).filter(|&k| !visited[k] && (matrix.get(node, k) || matrix.get(k, node))));
            }
        }

        let unreached: Vec<usize> = (0..n).rev().filter(|&k| !visited[k]).collect();
        if !unreached.is_empty() {
            tracing::trace!(removed = unreached.len(), "pruning nodes unreachable from root");
        }
        for node in unreached {
            self.remove_node(node);
        }
        self
    }

    /// Greedily delete nodes dominated by another node until none remain.
    ///
    /// Scans `i` then `j`, both descending, and restarts after every
    /// deletion. The root is never deleted, so `?0` keeps naming the
    /// individual. The result depends on scan order and is not guaranteed
    /// minimal.
    pub fn approx_minimize(&mut self) -> &mut Self {
        'restart: loop {
            let n = self.node_count();
            for i in (0..n).rev() {
                for j in (1..n).rev() {
                    if i != j && self.dominates(i, j) {
                        self.remove_node(j);
                        continue 'restart;
                    }
                }
            }
            return self;
        }
    }

    /// Whether node `j` can be dropped in favor of node `i`: `i` carries
    /// every label of `j`, is at least as connected to itself as `j` is to
    /// itself or to `i`, and every other node's edges to and from `i`
    /// cover its edges to and from `j`.
    fn dominates(&self, i: usize, j: usize) -> bool {
        if !self.concepts[i].is_superset(&self.concepts[j]) {
            return false;
        }
        let n = self.node_count();
        self.roles.values().all(|a| {
            let loop_ok = a.get(i, i) || !(a.get(j, j) || a.get(i, j) || a.get(j, i));
            loop_ok
                && (0..n)
                    .filter(|&k| k != j)
                    .all(|k| (a.get(i, k) || !a.get(j, k)) && (a.get(k, i) || !a.get(k, j)))
        })
    }
}

impl fmt::Display for ConjunctiveQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ConjunctiveQuery ({} nodes, {} edges)", self.node_count(), self.edge_count())?;
        for (i, labels) in self.concepts.iter().enumerate() {
            let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
            writeln!(f, "  ?{i}: {{{}}}", labels.join(", "))?;
        }
        for (role, matrix) in &self.roles {
            for (i, j) in matrix.edges() {
                writeln!(f, "  ?{i} -[{role}]-> ?{j}")?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
