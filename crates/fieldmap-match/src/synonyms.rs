//! Static synonym lookup built from schema configuration.

use std::collections::{BTreeMap, BTreeSet};

use fieldmap_model::TargetSchema;

use crate::normalize::normalize;

/// Precomputed synonym index for a set of target names.
///
/// Synonyms are stored canonically and indexed both ways: target name to its
/// token set, and canonical token to every target it is configured for. A
/// token may be a synonym candidate for several targets; disambiguation is
/// the resolver's job, not this table's.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    by_target: BTreeMap<String, BTreeSet<String>>,
    by_token: BTreeMap<String, BTreeSet<String>>,
}

impl SynonymTable {
    /// Build the table from a target schema's per-field synonym lists.
    pub fn from_schema(schema: &TargetSchema) -> Self {
        Self::from_entries(
            schema
                .fields
                .iter()
                .map(|field| (field.name.as_str(), field.synonyms.as_slice())),
        )
    }

    /// Build the table from (target, synonyms) pairs.
    pub fn from_entries<'a, I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [S])>,
        S: AsRef<str> + 'a,
    {
        let mut table = Self::default();
        for (target, synonyms) in entries {
            for synonym in synonyms {
                table.insert(target, synonym.as_ref());
            }
        }
        table
    }

    /// Register a synonym for a target. Blank synonyms are ignored.
    pub fn insert(&mut self, target: &str, synonym: &str) {
        let token = normalize(synonym);
        if token.is_empty() {
            return;
        }
        self.by_target
            .entry(target.to_string())
            .or_default()
            .insert(token.clone());
        self.by_token
            .entry(token)
            .or_default()
            .insert(target.to_string());
    }

    /// Canonical synonym tokens configured for a target.
    pub fn synonyms_of(&self, target: &str) -> Option<&BTreeSet<String>> {
        self.by_target.get(target)
    }

    /// True when `canonical_token` is a configured synonym of `target`.
    pub fn is_synonym(&self, canonical_token: &str, target: &str) -> bool {
        self.by_target
            .get(target)
            .is_some_and(|tokens| tokens.contains(canonical_token))
    }

    /// Every target the token is configured for, if any.
    pub fn targets_for(&self, canonical_token: &str) -> Option<&BTreeSet<String>> {
        self.by_token.get(canonical_token)
    }

    pub fn is_empty(&self) -> bool {
        self.by_target.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_model::TargetField;

    fn sample_table() -> SynonymTable {
        let schema = TargetSchema::new(
            "s",
            vec![
                TargetField::new("Technician Notes").with_synonyms(["Notes", "Comments"]),
                TargetField::new("Survey Date").with_synonyms(["Inspection Date"]),
            ],
        )
        .unwrap();
        SynonymTable::from_schema(&schema)
    }

    #[test]
    fn lookup_uses_canonical_tokens() {
        let table = sample_table();
        assert!(table.is_synonym("notes", "Technician Notes"));
        assert!(table.is_synonym("inspection date", "Survey Date"));
        assert!(!table.is_synonym("notes", "Survey Date"));
    }

    #[test]
    fn token_may_serve_multiple_targets() {
        let mut table = sample_table();
        table.insert("Field Notes", "Notes");
        let targets = table.targets_for("notes").unwrap();
        assert_eq!(targets.len(), 2);
        assert!(targets.contains("Technician Notes"));
        assert!(targets.contains("Field Notes"));
    }

    #[test]
    fn blank_synonyms_are_ignored() {
        let mut table = SynonymTable::default();
        table.insert("Target", "   ");
        assert!(table.is_empty());
    }
}
