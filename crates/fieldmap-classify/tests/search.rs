use fieldmap_classify::{ClassificationSearcher, SearchOptions, TreeOptions, parse_tree};
use fieldmap_match::{ScoreConfig, SynonymTable};
use fieldmap_model::{ClassificationNode, MatchBasis};
use serde_json::json;

fn searcher() -> ClassificationSearcher {
    ClassificationSearcher::new(SearchOptions::default())
}

fn three_level_tree() -> ClassificationNode {
    ClassificationNode::branch(
        "Pavement",
        vec![ClassificationNode::branch(
            "Surface Defect",
            vec![ClassificationNode::leaf("Alligator Crack")],
        )],
    )
}

#[test]
fn exact_leaf_query_returns_depth_and_path() {
    let tree = three_level_tree();
    let outcome = searcher().search(&tree, "Alligator Crack");

    let top = &outcome.matches[0];
    assert_eq!(top.label, "Alligator Crack");
    assert_eq!(top.depth, 2);
    assert_eq!(
        top.path,
        vec![
            "Pavement".to_string(),
            "Surface Defect".to_string(),
            "Alligator Crack".to_string()
        ]
    );
    assert_eq!(top.confidence, 1.0);
    assert_eq!(top.basis, MatchBasis::Exact);
}

#[test]
fn heterogeneous_child_keys_are_all_traversed() {
    let value = json!({
        "label": "Assets",
        "children": [
            {"label": "Bridge", "child_classifications": [
                {"label": "Bridge Deck"}
            ]}
        ],
        "items": [
            {"label": "Culvert", "choices": [
                {"label": "Box Culvert"}
            ]}
        ]
    });
    let tree = parse_tree(&value, &TreeOptions::default()).expect("parse tree");
    assert_eq!(tree.node_count(), 5);

    let outcome = searcher().search_forest(&tree.roots, "Box Culvert");
    let top = &outcome.matches[0];
    assert_eq!(top.label, "Box Culvert");
    assert_eq!(top.depth, 2);
    assert_eq!(top.path_display(), "Assets > Culvert > Box Culvert");
}

#[test]
fn equal_confidence_prefers_shallower_node() {
    // The same label appears at depth 1 and depth 2.
    let tree = ClassificationNode::branch(
        "Root",
        vec![
            ClassificationNode::branch(
                "Other",
                vec![ClassificationNode::leaf("Erosion")],
            ),
            ClassificationNode::leaf("Erosion"),
        ],
    );
    let outcome = searcher().search(&tree, "Erosion");
    assert_eq!(outcome.matches.len(), 2);
    assert_eq!(outcome.matches[0].depth, 1);
    assert_eq!(outcome.matches[1].depth, 2);
}

#[test]
fn equal_confidence_and_depth_keeps_traversal_order() {
    let tree = ClassificationNode::branch(
        "Root",
        vec![
            ClassificationNode::leaf("Crackk"),
            ClassificationNode::leaf("Crackz"),
        ],
    );
    let outcome = searcher().search(&tree, "Crackx");
    assert_eq!(outcome.matches.len(), 2);
    // Both are distance 1 from the query; the first-visited wins.
    assert_eq!(outcome.matches[0].label, "Crackk");
    assert_eq!(outcome.matches[1].label, "Crackz");
}

#[test]
fn label_synonyms_score_at_synonym_tier() {
    let mut synonyms = SynonymTable::default();
    synonyms.insert("Alligator Crack", "fatigue cracking");
    let searcher = ClassificationSearcher::new(SearchOptions::default()).with_synonyms(synonyms);

    let outcome = searcher.search(&three_level_tree(), "Fatigue Cracking");
    let top = &outcome.matches[0];
    assert_eq!(top.label, "Alligator Crack");
    assert_eq!(top.basis, MatchBasis::Synonym);
    assert_eq!(top.confidence, 0.85);
}

#[test]
fn trace_follows_traversal_order_exactly() {
    let options = SearchOptions {
        trace: true,
        ..SearchOptions::default()
    };
    let outcome = ClassificationSearcher::new(options).search(&three_level_tree(), "Surface Defect");

    let visited: Vec<(usize, &str)> = outcome
        .trace
        .iter()
        .map(|event| (event.depth, event.label.as_str()))
        .collect();
    assert_eq!(
        visited,
        vec![(0, "Pavement"), (1, "Surface Defect"), (2, "Alligator Crack")]
    );
    // Below-floor nodes appear in the trace without a score.
    assert!(outcome.trace[0].score.is_none());
    assert_eq!(outcome.trace[1].score, Some(1.0));
}

#[test]
fn limit_truncates_ranked_results() {
    let tree = ClassificationNode::branch(
        "Cracks",
        vec![
            ClassificationNode::leaf("Crack A"),
            ClassificationNode::leaf("Crack B"),
            ClassificationNode::leaf("Crack C"),
        ],
    );
    let options = SearchOptions {
        limit: Some(2),
        ..SearchOptions::default()
    };
    let outcome = ClassificationSearcher::new(options).search(&tree, "Crack");
    assert_eq!(outcome.matches.len(), 2);
}

#[test]
fn floor_excludes_unrelated_labels() {
    let options = SearchOptions {
        score: ScoreConfig {
            floor: 0.8,
            ..ScoreConfig::default()
        },
        ..SearchOptions::default()
    };
    let tree = ClassificationNode::branch(
        "Root",
        vec![ClassificationNode::leaf("Completely Unrelated")],
    );
    let outcome = ClassificationSearcher::new(options).search(&tree, "Erosion");
    assert!(outcome.matches.is_empty());
}
