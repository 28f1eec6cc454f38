//! Tiered confidence scoring for source-to-target comparisons.
//!
//! Tiers are checked in priority order and the first hit wins; scores are
//! never summed across tiers. Curated knowledge (exact names, configured
//! synonyms) always dominates the fuzzy metric, and the floor keeps
//! nonsensical low-similarity pairs out of the candidate set entirely.

use rapidfuzz::distance::levenshtein;

use fieldmap_model::MatchBasis;

use crate::normalize::normalize;
use crate::synonyms::SynonymTable;

/// Scoring knobs, all caller-configurable.
#[derive(Debug, Clone, Copy)]
pub struct ScoreConfig {
    /// Minimum fuzzy similarity for a pair to be emitted at all.
    pub floor: f32,
    /// Confidence assigned to exact canonical matches.
    pub exact_confidence: f32,
    /// Confidence assigned to synonym-table matches.
    pub synonym_confidence: f32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            floor: 0.5,
            exact_confidence: 1.0,
            synonym_confidence: 0.85,
        }
    }
}

/// A score that cleared the tier policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored {
    pub confidence: f32,
    pub basis: MatchBasis,
}

/// Scores source tokens against named targets using the tier policy.
#[derive(Debug, Clone)]
pub struct Scorer<'a> {
    synonyms: &'a SynonymTable,
    config: ScoreConfig,
}

impl<'a> Scorer<'a> {
    pub fn new(synonyms: &'a SynonymTable, config: ScoreConfig) -> Self {
        Self { synonyms, config }
    }

    pub fn config(&self) -> &ScoreConfig {
        &self.config
    }

    /// Score a canonical source token against a target.
    ///
    /// `target_name` is the raw target identity used for synonym lookup;
    /// `target_canonical` its precomputed canonical form. Returns `None`
    /// when no tier accepts the pair.
    pub fn score(
        &self,
        source_canonical: &str,
        target_name: &str,
        target_canonical: &str,
    ) -> Option<Scored> {
        if source_canonical.is_empty() || target_canonical.is_empty() {
            return None;
        }
        if source_canonical == target_canonical {
            return Some(Scored {
                confidence: self.config.exact_confidence,
                basis: MatchBasis::Exact,
            });
        }
        if self.synonyms.is_synonym(source_canonical, target_name) {
            return Some(Scored {
                confidence: self.config.synonym_confidence,
                basis: MatchBasis::Synonym,
            });
        }
        let similarity = similarity(source_canonical, target_canonical);
        if similarity >= self.config.floor {
            return Some(Scored {
                confidence: similarity,
                basis: MatchBasis::Fuzzy,
            });
        }
        None
    }

    /// Score a raw (un-normalized) source string against a target.
    pub fn score_raw(&self, source: &str, target_name: &str) -> Option<Scored> {
        self.score(&normalize(source), target_name, &normalize(target_name))
    }
}

/// Normalized edit-distance similarity: 1 − distance / max length.
pub fn similarity(left: &str, right: &str) -> f32 {
    levenshtein::normalized_similarity(left.chars(), right.chars()) as f32
}
