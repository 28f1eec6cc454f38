//! Field mapping types shared between the matching engine and its callers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a source field was matched to a target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchBasis {
    /// Canonical forms were identical.
    Exact,
    /// Source token is in the target field's configured synonym set.
    Synonym,
    /// Accepted on normalized edit-distance similarity.
    Fuzzy,
    /// Recalled from the persistent mapping memory.
    Memory,
}

impl MatchBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Synonym => "synonym",
            Self::Fuzzy => "fuzzy",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for MatchBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An accepted source-to-target pairing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldAssignment {
    /// Source field name as supplied by the caller.
    pub source_field: String,
    /// Target field name from the schema.
    pub target_field: String,
    /// Confidence score (0.0 to 1.0).
    pub confidence: f32,
    /// How the match was made.
    pub basis: MatchBasis,
}

/// A source field rejected at the input boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidField {
    /// The raw input as received.
    pub raw: String,
    /// Why it was rejected.
    pub reason: String,
}

/// Outcome of one resolution pass.
///
/// The assignment is injective on target fields: no two entries share a
/// `target_field`. Source and target fields that could not be paired above
/// the confidence floor are reported, never dropped.
#[derive(Debug, Clone, Default)]
pub struct MappingResult {
    /// Accepted assignments.
    pub assignments: Vec<FieldAssignment>,
    /// Source fields with no accepted pairing.
    pub unresolved_sources: Vec<String>,
    /// Target fields that received no source field.
    pub unresolved_targets: Vec<String>,
    /// Inputs rejected before scoring (blank names).
    pub invalid_fields: Vec<InvalidField>,
}

impl MappingResult {
    /// The assignment for a source field, if one was accepted.
    pub fn assignment_for(&self, source_field: &str) -> Option<&FieldAssignment> {
        self.assignments
            .iter()
            .find(|assignment| assignment.source_field == source_field)
    }

    /// True when every source field was paired and every input was valid.
    pub fn is_complete(&self) -> bool {
        self.unresolved_sources.is_empty() && self.invalid_fields.is_empty()
    }

    /// Convert to a serializable config for the downstream export step.
    pub fn to_config(&self, schema_name: &str) -> MappingConfig {
        MappingConfig {
            schema_name: schema_name.to_string(),
            mappings: self.assignments.clone(),
            unresolved_sources: self.unresolved_sources.clone(),
            unresolved_targets: self.unresolved_targets.clone(),
        }
    }
}

/// Serializable mapping configuration for a schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Target schema name this mapping applies to.
    pub schema_name: String,
    /// Accepted source-to-target mappings.
    pub mappings: Vec<FieldAssignment>,
    /// Source fields that could not be mapped.
    pub unresolved_sources: Vec<String>,
    /// Target fields that received no source field.
    pub unresolved_targets: Vec<String>,
}
