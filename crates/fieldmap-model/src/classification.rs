//! Classification taxonomy types.

use serde::{Deserialize, Serialize};

use crate::mapping::MatchBasis;

/// A node in a classification taxonomy.
///
/// Depth is not stored; it is derived from the node's position relative to
/// the root a search starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationNode {
    /// Display label for this node.
    pub label: String,
    /// Child nodes, in source order.
    #[serde(default)]
    pub children: Vec<ClassificationNode>,
}

impl ClassificationNode {
    /// Create a leaf node.
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Create a node with children.
    pub fn branch(label: impl Into<String>, children: Vec<ClassificationNode>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    /// Total node count in this subtree, self included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ClassificationNode::node_count)
            .sum::<usize>()
    }
}

/// One ranked result from a classification search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMatch {
    /// Label of the matched node.
    pub label: String,
    /// Ancestor labels from the search root down to the match, inclusive.
    pub path: Vec<String>,
    /// Distance from the search root (root = 0).
    pub depth: usize,
    /// Confidence score (0.0 to 1.0).
    pub confidence: f32,
    /// How the match was made.
    pub basis: MatchBasis,
}

impl SearchMatch {
    /// Path rendered as "A > B > C".
    pub fn path_display(&self) -> String {
        self.path.join(" > ")
    }
}

/// One entry of the optional search debug trace, in traversal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Node depth relative to the search root.
    pub depth: usize,
    /// Node label as visited.
    pub label: String,
    /// Score the node received, if it cleared the floor.
    pub score: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_count_covers_subtree() {
        let tree = ClassificationNode::branch(
            "Defects",
            vec![
                ClassificationNode::leaf("Crack"),
                ClassificationNode::branch("Surface", vec![ClassificationNode::leaf("Stain")]),
            ],
        );
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn path_display_joins_labels() {
        let result = SearchMatch {
            label: "Stain".to_string(),
            path: vec!["Defects".to_string(), "Surface".to_string(), "Stain".to_string()],
            depth: 2,
            confidence: 1.0,
            basis: MatchBasis::Exact,
        };
        assert_eq!(result.path_display(), "Defects > Surface > Stain");
    }
}
