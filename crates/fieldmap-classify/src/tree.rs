//! Classification tree construction from heterogeneous JSON.
//!
//! Source taxonomies do not agree on a child-container key: one export
//! nests under `children`, another under `child_classifications`, a third
//! under `items`. Rather than hard-coding one schema, construction unions
//! the contents of every recognized key per node, so mixed trees are a
//! legitimate input, not an error.

use serde_json::Value;
use thiserror::Error;

use fieldmap_model::ClassificationNode;

/// Child-container keys recognized by default.
pub const DEFAULT_CHILD_KEYS: &[&str] = &["children", "child_classifications", "items", "choices"];

/// Keys a node's label may appear under, checked in order.
const LABEL_KEYS: &[&str] = &["label", "name", "title"];

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("classification tree root must be an object or array, got {0}")]
    InvalidRoot(&'static str),
    #[error("classification tree contains no usable nodes")]
    Empty,
}

/// Tree construction options.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// Keys treated as equivalent child containers.
    pub child_keys: Vec<String>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            child_keys: DEFAULT_CHILD_KEYS.iter().map(|key| (*key).to_string()).collect(),
        }
    }
}

/// A malformed node skipped during construction.
#[derive(Debug, Clone)]
pub struct TreeIssue {
    /// JSON-pointer-like location of the offending node.
    pub location: String,
    /// Why it was skipped.
    pub reason: String,
}

/// Construction output: the usable roots plus per-node issues.
#[derive(Debug, Clone)]
pub struct ParsedTree {
    pub roots: Vec<ClassificationNode>,
    pub issues: Vec<TreeIssue>,
}

impl ParsedTree {
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(ClassificationNode::node_count).sum()
    }
}

/// Build classification nodes from a JSON tree.
///
/// The top level may be a single node object or an array of root nodes
/// (classification sets commonly export the latter). Nodes lacking a label
/// are reported in `issues` and skipped along with their subtrees; other
/// well-formed nodes are unaffected.
pub fn parse_tree(value: &Value, options: &TreeOptions) -> Result<ParsedTree, TreeError> {
    let mut issues = Vec::new();
    let roots = match value {
        Value::Object(_) => parse_node(value, "", options, &mut issues)
            .into_iter()
            .collect(),
        Value::Array(items) => parse_siblings(items, "", options, &mut issues),
        Value::Null => return Err(TreeError::InvalidRoot("null")),
        Value::Bool(_) => return Err(TreeError::InvalidRoot("bool")),
        Value::Number(_) => return Err(TreeError::InvalidRoot("number")),
        Value::String(_) => return Err(TreeError::InvalidRoot("string")),
    };
    if roots.is_empty() {
        return Err(TreeError::Empty);
    }
    Ok(ParsedTree { roots, issues })
}

fn parse_siblings(
    items: &[Value],
    location: &str,
    options: &TreeOptions,
    issues: &mut Vec<TreeIssue>,
) -> Vec<ClassificationNode> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            parse_node(item, &format!("{location}/{index}"), options, issues)
        })
        .collect()
}

fn parse_node(
    value: &Value,
    location: &str,
    options: &TreeOptions,
    issues: &mut Vec<TreeIssue>,
) -> Option<ClassificationNode> {
    let Value::Object(map) = value else {
        issues.push(TreeIssue {
            location: location.to_string(),
            reason: "node is not an object".to_string(),
        });
        return None;
    };
    let label = LABEL_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|label| !label.is_empty());
    let Some(label) = label else {
        issues.push(TreeIssue {
            location: location.to_string(),
            reason: "node has no label".to_string(),
        });
        return None;
    };

    // Union every recognized child container present on this node.
    let mut children = Vec::new();
    for key in &options.child_keys {
        if let Some(Value::Array(nested)) = map.get(key) {
            children.extend(parse_siblings(
                nested,
                &format!("{location}/{key}"),
                options,
                issues,
            ));
        }
    }
    Some(ClassificationNode::branch(label, children))
}
