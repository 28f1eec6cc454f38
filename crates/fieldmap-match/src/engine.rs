//! Assignment resolution between source fields and a target schema.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use tracing::debug;

use fieldmap_model::{
    FieldAssignment, InvalidField, MappingResult, MatchBasis, TargetSchema,
};

use crate::memory::MappingMemory;
use crate::normalize::normalize;
use crate::score::{ScoreConfig, Scorer};
use crate::synonyms::SynonymTable;

/// Resolves source field names onto a fixed target schema.
///
/// Resolution is greedy: candidates are taken in descending confidence
/// order and accepted whenever both endpoints are still free. This is a
/// deliberate simplicity/performance tradeoff, not an optimum-assignment
/// solver; a later pair is never revisited even if accepting it would have
/// raised the total score. What *is* guaranteed is that the result is
/// injective on target fields and fully deterministic: ties break on
/// (source, target) lexical order.
pub struct MatchEngine {
    schema: TargetSchema,
    canonical_targets: Vec<CanonicalTarget>,
    synonyms: SynonymTable,
    config: ScoreConfig,
}

struct CanonicalTarget {
    name: String,
    canonical: String,
}

struct Candidate {
    source_field: String,
    target_field: String,
    confidence: f32,
    basis: MatchBasis,
}

impl MatchEngine {
    /// Create an engine for a schema with default scoring.
    pub fn new(schema: TargetSchema) -> Self {
        Self::with_config(schema, ScoreConfig::default())
    }

    /// Create an engine with explicit scoring configuration.
    pub fn with_config(schema: TargetSchema, config: ScoreConfig) -> Self {
        let synonyms = SynonymTable::from_schema(&schema);
        let canonical_targets = schema
            .fields
            .iter()
            .map(|field| CanonicalTarget {
                name: field.name.clone(),
                canonical: normalize(&field.name),
            })
            .collect();
        Self {
            schema,
            canonical_targets,
            synonyms,
            config,
        }
    }

    pub fn schema(&self) -> &TargetSchema {
        &self.schema
    }

    /// Resolve source fields onto the schema.
    ///
    /// Learned mappings from `memory` take precedence over fresh scoring:
    /// a remembered token claims its target at confidence 1.0 before any
    /// scored candidate is considered. Unpairable source and target fields
    /// are reported in the unresolved lists; blank source names are
    /// rejected into `invalid_fields` without aborting the batch.
    pub fn resolve(
        &self,
        source_fields: &[String],
        memory: Option<&MappingMemory>,
    ) -> MappingResult {
        let mut assignments: Vec<FieldAssignment> = Vec::new();
        let mut invalid_fields: Vec<InvalidField> = Vec::new();
        let mut assigned_sources: BTreeSet<String> = BTreeSet::new();
        let mut assigned_targets: BTreeSet<String> = BTreeSet::new();

        // Boundary validation: blank and duplicate names never reach scoring.
        let mut sources: Vec<(&String, String)> = Vec::new();
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for field in source_fields {
            if field.trim().is_empty() {
                invalid_fields.push(InvalidField {
                    raw: field.clone(),
                    reason: "blank field name".to_string(),
                });
                continue;
            }
            if !seen.insert(field.as_str()) {
                invalid_fields.push(InvalidField {
                    raw: field.clone(),
                    reason: "duplicate field name".to_string(),
                });
                continue;
            }
            sources.push((field, normalize(field)));
        }

        // Pass 1: memory recall claims targets before fresh scoring.
        if let Some(memory) = memory {
            for (field, canonical) in &sources {
                if assigned_sources.contains(*field) {
                    continue;
                }
                let Some(target) = memory.lookup(canonical) else {
                    continue;
                };
                if assigned_targets.contains(&target) {
                    continue;
                }
                let Some(target_name) = self.schema.field(&target).map(|f| f.name.clone()) else {
                    debug!(token = %canonical, target = %target, "remembered target not in schema");
                    continue;
                };
                debug!(source = %field, target = %target_name, "assigned from memory");
                assigned_sources.insert((*field).clone());
                assigned_targets.insert(target_name.clone());
                assignments.push(FieldAssignment {
                    source_field: (*field).clone(),
                    target_field: target_name,
                    confidence: 1.0,
                    basis: MatchBasis::Memory,
                });
            }
        }

        // Pass 2: score every remaining pair.
        let scorer = Scorer::new(&self.synonyms, self.config);
        let mut candidates: Vec<Candidate> = Vec::new();
        for (field, canonical) in &sources {
            if assigned_sources.contains(*field) {
                continue;
            }
            for target in &self.canonical_targets {
                if assigned_targets.contains(&target.name) {
                    continue;
                }
                if let Some(scored) = scorer.score(canonical, &target.name, &target.canonical) {
                    candidates.push(Candidate {
                        source_field: (*field).clone(),
                        target_field: target.name.clone(),
                        confidence: scored.confidence,
                        basis: scored.basis,
                    });
                }
            }
        }

        // Deterministic order: confidence descending, then lexical.
        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.source_field.cmp(&b.source_field))
                .then_with(|| a.target_field.cmp(&b.target_field))
        });

        // Pass 3: greedy one-to-one acceptance.
        for candidate in candidates {
            if assigned_sources.contains(&candidate.source_field)
                || assigned_targets.contains(&candidate.target_field)
            {
                continue;
            }
            assigned_sources.insert(candidate.source_field.clone());
            assigned_targets.insert(candidate.target_field.clone());
            assignments.push(FieldAssignment {
                source_field: candidate.source_field,
                target_field: candidate.target_field,
                confidence: candidate.confidence,
                basis: candidate.basis,
            });
        }

        let unresolved_sources: Vec<String> = sources
            .iter()
            .map(|(field, _)| (*field).clone())
            .filter(|field| !assigned_sources.contains(field))
            .collect();
        let unresolved_targets: Vec<String> = self
            .schema
            .field_names()
            .filter(|name| !assigned_targets.contains(*name))
            .map(str::to_string)
            .collect();

        debug!(
            assigned = assignments.len(),
            unresolved_sources = unresolved_sources.len(),
            unresolved_targets = unresolved_targets.len(),
            invalid = invalid_fields.len(),
            "resolution pass complete"
        );

        MappingResult {
            assignments,
            unresolved_sources,
            unresolved_targets,
            invalid_fields,
        }
    }

    /// Confirm every assignment of a result into the memory store.
    ///
    /// Returns the canonical tokens whose confirmation conflicted with an
    /// existing mapping, paired with the stored target; conflicts are left
    /// untouched for the caller to resolve.
    pub fn confirm_result(
        &self,
        result: &MappingResult,
        memory: &MappingMemory,
    ) -> Vec<(String, String)> {
        let mut conflicts = Vec::new();
        for assignment in &result.assignments {
            let token = normalize(&assignment.source_field);
            if let crate::memory::ConfirmOutcome::Conflict { existing } =
                memory.confirm(&token, &assignment.target_field)
            {
                conflicts.push((token, existing));
            }
        }
        conflicts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_model::TargetField;

    fn schema() -> TargetSchema {
        TargetSchema::new(
            "inspections",
            vec![
                TargetField::new("Slice Length"),
                TargetField::new("Survey Date"),
                TargetField::new("Technician Notes").with_synonyms(["Notes"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn exact_canonical_match_assigns_at_full_confidence() {
        let engine = MatchEngine::new(schema());
        let result = engine.resolve(&["slice_length".to_string()], None);
        let assignment = result.assignment_for("slice_length").unwrap();
        assert_eq!(assignment.target_field, "Slice Length");
        assert_eq!(assignment.confidence, 1.0);
        assert_eq!(assignment.basis, MatchBasis::Exact);
    }

    #[test]
    fn blank_source_fields_are_rejected_not_fatal() {
        let engine = MatchEngine::new(schema());
        let result = engine.resolve(&["  ".to_string(), "Notes".to_string()], None);
        assert_eq!(result.invalid_fields.len(), 1);
        assert_eq!(result.invalid_fields[0].reason, "blank field name");
        assert!(result.assignment_for("Notes").is_some());
    }

    #[test]
    fn memory_hit_takes_precedence_over_scoring() {
        let engine = MatchEngine::new(schema());
        let memory = MappingMemory::new();
        // Remember a counter-intuitive mapping; it must win over the
        // exact-scoring tier.
        memory.confirm("notes", "Survey Date");
        let result = engine.resolve(&["Notes".to_string()], Some(&memory));
        let assignment = result.assignment_for("Notes").unwrap();
        assert_eq!(assignment.target_field, "Survey Date");
        assert_eq!(assignment.basis, MatchBasis::Memory);
        assert_eq!(assignment.confidence, 1.0);
    }

    #[test]
    fn remembered_target_already_claimed_falls_back_to_scoring() {
        let engine = MatchEngine::new(schema());
        let memory = MappingMemory::new();
        memory.confirm("survey date", "Survey Date");
        memory.confirm("notes", "Survey Date");
        let result = engine.resolve(
            &["Survey_Date".to_string(), "Notes".to_string()],
            Some(&memory),
        );
        // "Survey_Date" claims the remembered target first; "Notes" then
        // resolves through its synonym instead.
        assert_eq!(
            result.assignment_for("Survey_Date").unwrap().basis,
            MatchBasis::Memory
        );
        let notes = result.assignment_for("Notes").unwrap();
        assert_eq!(notes.target_field, "Technician Notes");
        assert_eq!(notes.basis, MatchBasis::Synonym);
    }
}
