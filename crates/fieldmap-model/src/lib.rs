#![deny(unsafe_code)]

pub mod classification;
pub mod error;
pub mod field;
pub mod mapping;

pub use classification::{ClassificationNode, SearchMatch, TraceEvent};
pub use error::{ModelError, Result};
pub use field::{TargetField, TargetSchema};
pub use mapping::{
    FieldAssignment, InvalidField, MappingConfig, MappingResult, MatchBasis,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_config_serializes() {
        let config = MappingConfig {
            schema_name: "inspections".to_string(),
            mappings: vec![FieldAssignment {
                source_field: "slice_length".to_string(),
                target_field: "Slice Length".to_string(),
                confidence: 1.0,
                basis: MatchBasis::Exact,
            }],
            unresolved_sources: vec!["extra".to_string()],
            unresolved_targets: vec![],
        };
        let json = serde_json::to_string(&config).expect("serialize config");
        let round: MappingConfig = serde_json::from_str(&json).expect("deserialize config");
        assert_eq!(round.schema_name, "inspections");
        assert_eq!(round.mappings[0].basis, MatchBasis::Exact);
    }

    #[test]
    fn schema_rejects_duplicates() {
        let schema = TargetSchema::from_names("dup", &["A", "A"]);
        assert!(schema.is_err());
    }
}
