//! Ranked search over classification trees.

use std::cmp::Ordering;

use tracing::trace;

use fieldmap_match::normalize::normalize;
use fieldmap_match::score::{ScoreConfig, Scorer};
use fieldmap_match::synonyms::SynonymTable;
use fieldmap_model::{ClassificationNode, SearchMatch, TraceEvent};

/// Search configuration.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Scoring tiers and floor, shared with field matching.
    pub score: ScoreConfig,
    /// Keep only the top N results; `None` keeps everything above the floor.
    pub limit: Option<usize>,
    /// Record a per-visited-node trace in traversal order.
    pub trace: bool,
}

/// Outcome of one search: ranked matches plus the optional trace.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Matches, best first.
    pub matches: Vec<SearchMatch>,
    /// Per-node trace in exact traversal order; empty unless enabled.
    pub trace: Vec<TraceEvent>,
}

/// Searches classification trees for the best node for a query label.
pub struct ClassificationSearcher {
    synonyms: SynonymTable,
    options: SearchOptions,
}

impl ClassificationSearcher {
    /// Create a searcher with no label synonyms.
    pub fn new(options: SearchOptions) -> Self {
        Self {
            synonyms: SynonymTable::default(),
            options,
        }
    }

    /// Attach a label-level synonym table (query token to node labels).
    #[must_use]
    pub fn with_synonyms(mut self, synonyms: SynonymTable) -> Self {
        self.synonyms = synonyms;
        self
    }

    /// Search a single tree. Depth is relative to `root` (root = 0).
    pub fn search(&self, root: &ClassificationNode, query: &str) -> SearchOutcome {
        self.search_forest(std::slice::from_ref(root), query)
    }

    /// Search several root nodes as one forest, sharing one ranking.
    ///
    /// Traversal is depth-first in child order. Each result carries the
    /// matched node's depth and its full ancestor path, built incrementally
    /// during traversal. Ranking: confidence descending, then shallower
    /// depth (prefer the broader label when equally confident), then
    /// first-encountered order.
    pub fn search_forest(&self, roots: &[ClassificationNode], query: &str) -> SearchOutcome {
        let query_canonical = normalize(query);
        let scorer = Scorer::new(&self.synonyms, self.options.score);
        let mut outcome = SearchOutcome::default();
        let mut ranked: Vec<(usize, SearchMatch)> = Vec::new();
        let mut visit_order = 0usize;

        // Explicit stack; path holds ancestor labels down to the current node.
        let mut stack: Vec<(&ClassificationNode, usize)> = Vec::new();
        let mut path: Vec<String> = Vec::new();
        for root in roots.iter().rev() {
            stack.push((root, 0));
        }
        while let Some((node, depth)) = stack.pop() {
            path.truncate(depth);
            path.push(node.label.clone());

            let scored = scorer.score(
                &query_canonical,
                &node.label,
                &normalize(&node.label),
            );
            if self.options.trace {
                outcome.trace.push(TraceEvent {
                    depth,
                    label: node.label.clone(),
                    score: scored.map(|s| s.confidence),
                });
            }
            trace!(
                depth,
                label = %node.label,
                score = scored.map(|s| f64::from(s.confidence)),
                "visited classification node"
            );
            if let Some(scored) = scored {
                ranked.push((
                    visit_order,
                    SearchMatch {
                        label: node.label.clone(),
                        path: path.clone(),
                        depth,
                        confidence: scored.confidence,
                        basis: scored.basis,
                    },
                ));
            }
            visit_order += 1;

            for child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }

        ranked.sort_by(|(order_a, a), (order_b, b)| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.depth.cmp(&b.depth))
                .then_with(|| order_a.cmp(order_b))
        });
        outcome.matches = ranked.into_iter().map(|(_, result)| result).collect();
        if let Some(limit) = self.options.limit {
            outcome.matches.truncate(limit);
        }
        outcome
    }
}
