//! Individual descriptions → most-specific queries, and label cleanup.
//!
//! Datasets describe an explained individual as a root with typed parts:
//! an image containing line segments that intersect, a scene containing
//! objects, or a flat record with no parts at all. `IndividualDescription`
//! captures that shape independently of any ontology library; an external
//! loader fills it in and `to_query` turns it into the MSQ the scheduler
//! consumes.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::{AdjacencyMatrix, ConceptSet, ConjunctiveQuery};
use crate::{Error, Result};

/// Concept → every concept that generalizes it, supplied by a reasoner.
pub type SubsumptionClosure = BTreeMap<String, BTreeSet<String>>;

/// One part of an individual (a line segment, an object in a scene).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub concepts: ConceptSet,
    /// Relation name → indices (into the parts list) this part points to.
    #[serde(default)]
    pub links: BTreeMap<String, Vec<usize>>,
}

impl Part {
    pub fn new<I, S>(concepts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { concepts: concepts.into_iter().map(Into::into).collect(), links: BTreeMap::new() }
    }

    pub fn with_link(mut self, role: impl Into<String>, target: usize) -> Self {
        self.links.entry(role.into()).or_default().push(target);
        self
    }
}

/// An individual and its parts, before conversion to a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualDescription {
    pub concepts: ConceptSet,
    #[serde(default)]
    pub parts: Vec<Part>,
    /// Relation linking the individual to each of its parts, e.g. `contains`.
    #[serde(default)]
    pub containment_role: Option<String>,
}

impl IndividualDescription {
    pub fn new<I, S>(concepts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { concepts: concepts.into_iter().map(Into::into).collect(), ..Default::default() }
    }

    pub fn contains_via(mut self, role: impl Into<String>) -> Self {
        self.containment_role = Some(role.into());
        self
    }

    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Build the most-specific query: the individual is node 0, part `p`
    /// is node `p + 1`.
    pub fn to_query(&self) -> Result<ConjunctiveQuery> {
        let n = self.parts.len() + 1;
        let mut concepts = Vec::with_capacity(n);
        concepts.push(self.concepts.clone());
        concepts.extend(self.parts.iter().map(|p| p.concepts.clone()));

        let mut roles: BTreeMap<String, AdjacencyMatrix> = BTreeMap::new();
        if let Some(role) = &self.containment_role {
            let matrix = roles.entry(role.clone()).or_insert_with(|| AdjacencyMatrix::new(n));
            for node in 1..n {
                matrix.set(0, node, true);
            }
        }
        for (p, part) in self.parts.iter().enumerate() {
            for (role, targets) in &part.links {
                let matrix = roles.entry(role.clone()).or_insert_with(|| AdjacencyMatrix::new(n));
                for &target in targets {
                    if target >= self.parts.len() {
                        return Err(Error::InvalidShape(format!(
                            "part {p} links via '{role}' to part {target}, only {} parts",
                            self.parts.len()
                        )));
                    }
                    matrix.set(p + 1, target + 1, true);
                }
            }
        }

        ConjunctiveQuery::new(concepts, roles)
    }
}

/// Drop every label that generalizes another label on the same node.
///
/// With `Seven ⊑ Digit`, a node labeled `{Digit, Seven}` keeps only `Seven`.
pub fn strip_subsumed(query: &ConjunctiveQuery, closure: &SubsumptionClosure) -> Result<ConjunctiveQuery> {
    let concepts = query
        .concepts()
        .iter()
        .map(|labels| {
            labels
                .iter()
                .filter(|candidate| {
                    !labels.iter().any(|other| {
                        other != *candidate && closure.get(other).is_some_and(|ancestors| ancestors.contains(*candidate))
                    })
                })
                .cloned()
                .collect::<ConceptSet>()
        })
        .collect();
    ConjunctiveQuery::new(concepts, query.roles().clone())
}
