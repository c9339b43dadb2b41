//! # Query Model
//!
//! The conjunctive query and the pieces it is built from. Pure data plus
//! structural operations: no I/O, no shared state.

pub mod matrix;
pub mod query;
pub mod dissimilarity;

pub use matrix::AdjacencyMatrix;
pub use query::{ConceptSet, ConjunctiveQuery, RoleDegrees};
pub use dissimilarity::dissimilarity;
