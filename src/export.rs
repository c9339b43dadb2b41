//! Query-language export — render explanations as text patterns.
//!
//! Each explanation becomes one query whose distinguished variable is the
//! root node, i.e. the explained individual:
//!
//! ```text
//! ConjunctiveQuery → to_sparql() → prefix onto: <…> select distinct ?0 where { … }
//!                  → to_cypher() → MATCH (n0:…)-[:…]->(n1) RETURN DISTINCT n0
//! ```
//!
//! Clause order is deterministic: nodes ascending with labels in set
//! order, then relations by name with edges row-major.

use std::io::Write;

use crate::model::ConjunctiveQuery;
use crate::Result;

/// Render one explanation as a SPARQL `select distinct ?0` query.
pub fn to_sparql(query: &ConjunctiveQuery, prefix: &str) -> String {
    let mut clauses = Vec::new();

    for (i, labels) in query.concepts().iter().enumerate() {
        if labels.is_empty() {
            continue;
        }
        let types: Vec<String> = labels.iter().map(|c| format!("onto:{c}")).collect();
        clauses.push(format!("?{i} a {} .", types.join(", ")));
    }

    for (role, matrix) in query.roles() {
        for (i, j) in matrix.edges() {
            clauses.push(format!("?{i} onto:{role} ?{j} ."));
        }
    }

    let body = if clauses.is_empty() { String::new() } else { format!("{} ", clauses.join(" ")) };
    format!("prefix onto: <{prefix}> select distinct ?0 where {{ {body}}}")
}

/// Write every explanation as SPARQL, one query per line.
pub fn write_sparql(queries: &[ConjunctiveQuery], prefix: &str, writer: &mut dyn Write) -> Result<()> {
    for query in queries {
        writeln!(writer, "{}", to_sparql(query, prefix))?;
    }
    Ok(())
}

/// Render one explanation as a Cypher `MATCH` pattern returning the root.
pub fn to_cypher(query: &ConjunctiveQuery) -> String {
    let mut patterns = Vec::new();

    for (i, labels) in query.concepts().iter().enumerate() {
        let labels: String = labels.iter().map(|c| format!(":{}", escape_identifier(c))).collect();
        patterns.push(format!("(n{i}{labels})"));
    }

    for (role, matrix) in query.roles() {
        for (i, j) in matrix.edges() {
            patterns.push(format!("(n{i})-[:{}]->(n{j})", escape_identifier(role)));
        }
    }

    if patterns.is_empty() {
        return String::new();
    }
    format!("MATCH {} RETURN DISTINCT n0", patterns.join(", "))
}

/// Backtick-quote names that are not plain identifiers.
fn escape_identifier(name: &str) -> String {
    let plain = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("`{}`", name.replace('`', "``"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::model::{AdjacencyMatrix, ConceptSet};
    use pretty_assertions::assert_eq;

    fn seven() -> ConjunctiveQuery {
        let concepts: Vec<ConceptSet> = vec![
            ["Digit".to_string()].into_iter().collect(),
            ["Line".to_string(), "Horizontal".to_string()].into_iter().collect(),
            ConceptSet::new(),
        ];
        let mut roles = BTreeMap::new();
        roles.insert("contains".to_string(), AdjacencyMatrix::from_edges(3, [(0, 1), (0, 2)]).unwrap());
        ConjunctiveQuery::new(concepts, roles).unwrap()
    }

    #[test]
    fn test_to_sparql() {
        assert_eq!(
            to_sparql(&seven(), "http://example.org/mnist#"),
            "prefix onto: <http://example.org/mnist#> select distinct ?0 where { \
             ?0 a onto:Digit . ?1 a onto:Horizontal, onto:Line . \
             ?0 onto:contains ?1 . ?0 onto:contains ?2 . }"
        );
    }

    #[test]
    fn test_to_sparql_empty_pattern() {
        let q = ConjunctiveQuery::single(Vec::<String>::new());
        assert_eq!(to_sparql(&q, "p:"), "prefix onto: <p:> select distinct ?0 where { }");
    }

    #[test]
    fn test_write_sparql_one_per_line() {
        let mut out = Vec::new();
        write_sparql(&[seven(), ConjunctiveQuery::single(["Digit"])], "p:", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().contains("?0 a onto:Digit ."));
    }

    #[test]
    fn test_to_cypher() {
        assert_eq!(
            to_cypher(&seven()),
            "MATCH (n0:Digit), (n1:Horizontal:Line), (n2), \
             (n0)-[:contains]->(n1), (n0)-[:contains]->(n2) RETURN DISTINCT n0"
        );
    }

    #[test]
    fn test_escape_identifier() {
        assert_eq!(escape_identifier("Line"), "Line");
        assert_eq!(escape_identifier("has part"), "`has part`");
        assert_eq!(escape_identifier("9lives"), "`9lives`");
    }
}
