use std::collections::BTreeSet;

use fieldmap_match::{MatchEngine, MappingMemory, ScoreConfig};
use fieldmap_model::{MatchBasis, TargetField, TargetSchema};

fn survey_schema() -> TargetSchema {
    TargetSchema::new(
        "survey_export",
        vec![
            TargetField::new("Slice Length"),
            TargetField::new("Survey Date"),
            TargetField::new("Technician Notes").with_synonyms(["Notes"]),
        ],
    )
    .expect("valid schema")
}

fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

#[test]
fn survey_scenario_resolves_every_field() {
    let engine = MatchEngine::new(survey_schema());
    let result = engine.resolve(&fields(&["slice_length", "SurveyDate", "Notes"]), None);

    assert!(result.unresolved_sources.is_empty(), "{result:?}");
    assert!(result.unresolved_targets.is_empty(), "{result:?}");
    assert!(result.invalid_fields.is_empty());

    let slice = result.assignment_for("slice_length").unwrap();
    assert_eq!(slice.target_field, "Slice Length");
    assert_eq!(slice.basis, MatchBasis::Exact);
    assert_eq!(slice.confidence, 1.0);

    let date = result.assignment_for("SurveyDate").unwrap();
    assert_eq!(date.target_field, "Survey Date");
    assert_eq!(date.basis, MatchBasis::Fuzzy);
    assert!(date.confidence > 0.85, "got {}", date.confidence);

    let notes = result.assignment_for("Notes").unwrap();
    assert_eq!(notes.target_field, "Technician Notes");
    assert_eq!(notes.basis, MatchBasis::Synonym);
    assert_eq!(notes.confidence, 0.85);
}

#[test]
fn assignment_is_injective_on_targets() {
    let engine = MatchEngine::new(survey_schema());
    // Every source resembles "Survey Date"; only one may claim it.
    let result = engine.resolve(
        &fields(&["survey_date", "SurveyDate", "survey date ", "surveydat"]),
        None,
    );
    let targets: Vec<&str> = result
        .assignments
        .iter()
        .map(|a| a.target_field.as_str())
        .collect();
    let distinct: BTreeSet<&str> = targets.iter().copied().collect();
    assert_eq!(targets.len(), distinct.len(), "duplicate target in {targets:?}");
}

#[test]
fn equal_scores_break_ties_lexically() {
    let schema = TargetSchema::from_names("t", &["Reading"]).expect("valid schema");
    let engine = MatchEngine::new(schema);
    // Both sources normalize to the same distance from "reading".
    let result = engine.resolve(&fields(&["readinb", "readina"]), None);

    assert_eq!(result.assignments.len(), 1);
    let winner = &result.assignments[0];
    assert_eq!(winner.source_field, "readina");
    assert_eq!(result.unresolved_sources, vec!["readinb".to_string()]);
}

#[test]
fn duplicate_source_names_are_rejected_at_the_boundary() {
    let engine = MatchEngine::new(survey_schema());
    let result = engine.resolve(&fields(&["Notes", "Notes"]), None);
    assert_eq!(result.assignments.len(), 1);
    assert_eq!(result.invalid_fields.len(), 1);
    assert_eq!(result.invalid_fields[0].reason, "duplicate field name");
}

#[test]
fn unpairable_fields_are_reported_not_dropped() {
    let engine = MatchEngine::new(survey_schema());
    let result = engine.resolve(&fields(&["slice_length", "xyzzy"]), None);

    assert_eq!(result.unresolved_sources, vec!["xyzzy".to_string()]);
    let unresolved_targets: BTreeSet<&str> = result
        .unresolved_targets
        .iter()
        .map(String::as_str)
        .collect();
    assert!(unresolved_targets.contains("Survey Date"));
    assert!(unresolved_targets.contains("Technician Notes"));
}

#[test]
fn raised_floor_excludes_marginal_candidates() {
    let schema = TargetSchema::from_names("t", &["Survey Date"]).expect("valid schema");
    let engine = MatchEngine::with_config(
        schema,
        ScoreConfig {
            floor: 0.95,
            ..ScoreConfig::default()
        },
    );
    let result = engine.resolve(&fields(&["SurveyDate"]), None);
    assert!(result.assignments.is_empty());
    assert_eq!(result.unresolved_sources, vec!["SurveyDate".to_string()]);
}

#[test]
fn memory_applies_across_forms_with_different_spellings() {
    let engine = MatchEngine::new(survey_schema());
    let memory = MappingMemory::new();

    // First form confirms its resolved assignments.
    let first = engine.resolve(&fields(&["slice_length", "Notes"]), Some(&memory));
    let conflicts = engine.confirm_result(&first, &memory);
    assert!(conflicts.is_empty());

    // A second form spells the same fields differently but normalizes to
    // the same tokens, so memory recalls them at full confidence.
    let second = engine.resolve(&fields(&["Slice-Length", "NOTES"]), Some(&memory));
    let slice = second.assignment_for("Slice-Length").unwrap();
    assert_eq!(slice.basis, MatchBasis::Memory);
    assert_eq!(slice.confidence, 1.0);
    let notes = second.assignment_for("NOTES").unwrap();
    assert_eq!(notes.target_field, "Technician Notes");
    assert_eq!(notes.basis, MatchBasis::Memory);
}

#[test]
fn confirm_result_surfaces_conflicts() {
    let engine = MatchEngine::new(survey_schema());
    let memory = MappingMemory::new();
    memory.confirm("slice length", "Survey Date");

    // Resolve without memory so scoring pairs slice_length with its exact
    // target, then confirming collides with the stored mapping.
    let result = engine.resolve(&fields(&["slice_length"]), None);
    let conflicts = engine.confirm_result(&result, &memory);
    assert_eq!(
        conflicts,
        vec![("slice length".to_string(), "Survey Date".to_string())]
    );
    // The stored mapping is untouched.
    assert_eq!(memory.lookup("slice length").as_deref(), Some("Survey Date"));
}
