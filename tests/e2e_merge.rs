//! End-to-end tests for the merge operators and the structural passes
//! that follow them.

use pretty_assertions::assert_eq;
use querygen::individual::{IndividualDescription, Part};
use querygen::{
    ConceptSet, ConjunctiveQuery, MergeOperator, MergeStrategy, dissimilarity, greedy_matching, qlcs,
};

fn labels(items: &[&str]) -> ConceptSet {
    items.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// Helper: a digit whose segments intersect in a chain
// ============================================================================

fn chained_digit(kind: &str, segments: &[&[&str]]) -> ConjunctiveQuery {
    let mut desc = IndividualDescription::new(["Digit", kind]).contains_via("contains");
    for (k, segment) in segments.iter().enumerate() {
        let mut part = Part::new(segment.iter().copied());
        if k + 1 < segments.len() {
            part = part.with_link("intersects", k + 1);
        }
        if k > 0 {
            part = part.with_link("intersects", k - 1);
        }
        desc = desc.with_part(part);
    }
    desc.to_query().unwrap()
}

// ============================================================================
// 1. Disjoint single nodes generalize to an unlabeled node
// ============================================================================

#[test]
fn test_dog_and_animal() {
    let dog = ConjunctiveQuery::single(["Dog"]);
    let animal = ConjunctiveQuery::single(["Animal"]);

    let product = qlcs(&dog, &animal).unwrap();
    assert_eq!(product.node_count(), 1);
    assert_eq!(product.concepts(), &[labels(&[])]);

    for strategy in [MergeStrategy::Exact, MergeStrategy::Greedy] {
        let merged = strategy.merge(&dog, &animal).unwrap();
        assert_eq!(merged.node_count(), 1);
        assert!(merged.concepts()[0].is_empty());
        assert_eq!(merged.edge_count(), 0);
    }
}

// ============================================================================
// 2. Product graph size and pruning
// ============================================================================

#[test]
fn test_product_is_pruned_to_root_component() {
    let seven = chained_digit("Seven", &[&["Line", "Horizontal"], &["Line", "Diagonal"]]);
    let four = chained_digit("Four", &[&["Line", "Vertical"], &["Line", "Horizontal"], &["Line", "Diagonal"]]);

    let product = qlcs(&seven, &four).unwrap();
    assert_eq!(product.node_count(), seven.node_count() * four.node_count());

    let mut pruned = product.clone();
    pruned.remove_non_connected();
    assert!(pruned.node_count() < product.node_count());
    assert_eq!(pruned.concepts()[0], labels(&["Digit"]));
}

// ============================================================================
// 3. Greedy matching keeps structure both inputs share
// ============================================================================

#[test]
fn test_greedy_keeps_shared_intersection() {
    let seven = chained_digit("Seven", &[&["Line", "Horizontal"], &["Line", "Diagonal"]]);
    let four = chained_digit("Four", &[&["Line", "Vertical"], &["Line", "Horizontal"], &["Line", "Diagonal"]]);

    let merged = greedy_matching(&seven, &four).unwrap();
    assert_eq!(merged.node_count(), seven.node_count());
    assert_eq!(merged.concepts()[0], labels(&["Digit"]));
    // Horizontal and Diagonal intersect in both digits.
    assert_eq!(merged.concepts()[1], labels(&["Horizontal", "Line"]));
    assert_eq!(merged.concepts()[2], labels(&["Diagonal", "Line"]));
    assert!(merged.has_edge("intersects", 1, 2));
    assert!(merged.has_edge("intersects", 2, 1));
    assert!(merged.has_edge("contains", 0, 1));
}

#[test]
fn test_greedy_generalization_is_sound() {
    let seven = chained_digit("Seven", &[&["Line", "Horizontal"], &["Line", "Diagonal"]]);
    let one = chained_digit("One", &[&["Line", "Vertical"]]);

    let merged = greedy_matching(&seven, &one).unwrap();
    // Node j of the result pairs node j of the smaller query with some node of the larger one.
    for (j, node_labels) in merged.concepts().iter().enumerate() {
        assert!(node_labels.is_subset(&one.concepts()[j]));
        assert!(seven.concepts().iter().any(|c| node_labels.is_subset(c)));
    }
}

// ============================================================================
// 4. Merging a query with itself
// ============================================================================

#[test]
fn test_greedy_self_merge_is_identity() {
    let seven = chained_digit("Seven", &[&["Line", "Horizontal"], &["Line", "Diagonal"]]);
    let merged = MergeStrategy::Greedy.merge(&seven, &seven).unwrap();
    assert_eq!(merged, seven);
    assert_eq!(dissimilarity(&merged, &seven), 0);
}

#[test]
fn test_exact_self_merge_keeps_root() {
    // The product also pairs Horizontal with Diagonal; those cross nodes
    // share only "Line" and survive minimization, so the result is larger.
    let seven = chained_digit("Seven", &[&["Line", "Horizontal"], &["Line", "Diagonal"]]);
    let merged = MergeStrategy::Exact.merge(&seven, &seven).unwrap();
    assert_eq!(merged.concepts()[0], labels(&["Digit", "Seven"]));
    assert!(merged.node_count() >= seven.node_count());
}

// ============================================================================
// 5. The root stays node 0 through pruning and minimization
// ============================================================================

fn digit_with_smudge(kind: &str, smudge: &str) -> ConjunctiveQuery {
    // A stray blob points at the line the digit contains.
    let json = format!(
        r#"{{
            "concepts": [["{kind}"], ["X"], ["{smudge}"]],
            "roles": {{"contains": [[false, true, false], [false, false, false], [false, true, false]]}}
        }}"#
    );
    ConjunctiveQuery::from_json(&json).unwrap()
}

#[test]
fn test_merge_keeps_root_at_node_zero() {
    let seven = digit_with_smudge("Seven", "Blob");
    let one = digit_with_smudge("One", "Smudge");

    for strategy in [MergeStrategy::Greedy, MergeStrategy::Exact] {
        let merged = strategy.merge(&seven, &one).unwrap();
        assert_eq!(merged.node_count(), 2, "{strategy:?}: {merged}");
        assert!(merged.concepts()[0].is_empty(), "{strategy:?}: {merged}");
        assert_eq!(merged.concepts()[1], labels(&["X"]));
        assert!(merged.has_edge("contains", 0, 1));
        assert!(!merged.has_edge("contains", 1, 0));
    }
}

#[test]
fn test_merged_root_carries_shared_root_labels() {
    let seven = chained_digit("Seven", &[&["Line", "Horizontal"], &["Line", "Diagonal"]]);
    let four = chained_digit("Four", &[&["Line", "Vertical"], &["Line", "Horizontal"], &["Line", "Diagonal"]]);
    let one = chained_digit("One", &[&["Line", "Vertical"]]);

    for strategy in [MergeStrategy::Greedy, MergeStrategy::Exact] {
        for (a, b) in [(&seven, &four), (&four, &one), (&one, &seven)] {
            let merged = strategy.merge(a, b).unwrap();
            assert_eq!(merged.concepts()[0], labels(&["Digit"]), "{strategy:?}: {merged}");
        }
    }
}

// ============================================================================
// 6. Queries survive a JSON round trip intact
// ============================================================================

#[test]
fn test_query_json_boundary() {
    let json = r#"{
        "concepts": [["Digit", "Seven"], ["Line"], ["Line", "Diagonal"]],
        "roles": {
            "contains": [[false, true, true], [false, false, false], [false, false, false]]
        }
    }"#;
    let q = ConjunctiveQuery::from_json(json).unwrap();
    assert_eq!(q.node_count(), 3);
    assert_eq!(q.out_degree("contains", 0), 2);
    assert_eq!(ConjunctiveQuery::from_json(&q.to_json().unwrap()).unwrap(), q);
}
