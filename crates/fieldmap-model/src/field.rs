//! Target schema definitions.
//!
//! A [`TargetSchema`] is the fixed, ordered set of destination fields an
//! export run maps source fields onto. Schemas are supplied by configuration
//! and are read-only during resolution.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// A destination field the export schema requires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetField {
    /// Destination field name (e.g., "Slice Length").
    pub name: String,
    /// Optional human-readable label from configuration.
    #[serde(default)]
    pub label: Option<String>,
    /// Source spellings configured as equivalent to this field.
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl TargetField {
    /// Create a field with no label or synonyms.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            synonyms: Vec::new(),
        }
    }

    /// Attach configured synonyms.
    #[must_use]
    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }
}

/// The ordered set of destination fields for one export run.
///
/// Field names are distinct and non-blank; both are enforced at
/// construction so resolution never has to re-validate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSchema {
    /// Schema name (e.g., the destination sheet or table name).
    pub name: String,
    /// Destination fields, in destination order.
    pub fields: Vec<TargetField>,
}

impl TargetSchema {
    /// Create a schema, validating that field names are non-blank and distinct.
    pub fn new(name: impl Into<String>, fields: Vec<TargetField>) -> Result<Self> {
        let name = name.into();
        if fields.is_empty() {
            return Err(ModelError::EmptySchema(name));
        }
        let mut seen = std::collections::BTreeSet::new();
        for (position, field) in fields.iter().enumerate() {
            let trimmed = field.name.trim();
            if trimmed.is_empty() {
                return Err(ModelError::BlankTargetField(position));
            }
            if !seen.insert(trimmed.to_lowercase()) {
                return Err(ModelError::DuplicateTargetField(field.name.clone()));
            }
        }
        Ok(Self { name, fields })
    }

    /// Convenience constructor from bare field names.
    pub fn from_names(name: impl Into<String>, names: &[&str]) -> Result<Self> {
        Self::new(name, names.iter().map(|n| TargetField::new(*n)).collect())
    }

    /// Look up a field by name, case-insensitive.
    pub fn field(&self, name: &str) -> Option<&TargetField> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }

    /// Field names in schema order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_field() {
        let err = TargetSchema::new("s", vec![TargetField::new("  ")]).unwrap_err();
        assert!(matches!(err, ModelError::BlankTargetField(0)));
    }

    #[test]
    fn duplicate_detection_is_case_insensitive() {
        let err = TargetSchema::from_names("s", &["Notes", "notes"]).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateTargetField(_)));
    }

    #[test]
    fn field_lookup_ignores_case() {
        let schema = TargetSchema::from_names("s", &["Survey Date"]).unwrap();
        assert!(schema.field("survey date").is_some());
        assert!(schema.field("missing").is_none());
    }
}
