#![deny(unsafe_code)]

//! Hierarchical classification search.
//!
//! Builds classification trees from JSON whose child-container key varies
//! per node, then ranks nodes against a free-text query label with the same
//! tiered scoring the field matcher uses.

pub mod search;
pub mod tree;

pub use search::{ClassificationSearcher, SearchOptions, SearchOutcome};
pub use tree::{
    DEFAULT_CHILD_KEYS, ParsedTree, TreeError, TreeIssue, TreeOptions, parse_tree,
};
