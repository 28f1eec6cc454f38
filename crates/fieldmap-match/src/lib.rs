#![deny(unsafe_code)]

//! Field-name matching engine.
//!
//! Maps arbitrary, inconsistently-named source fields onto a fixed target
//! schema with confidence scoring, a one-to-one assignment guarantee, and a
//! persistent memory of confirmed mappings that applies across forms and
//! sessions.

pub mod engine;
pub mod form;
pub mod memory;
pub mod normalize;
pub mod score;
pub mod synonyms;

pub use engine::MatchEngine;
pub use memory::{ConfirmOutcome, MappingMemory, MemoryEntry};
pub use normalize::normalize;
pub use score::{ScoreConfig, Scored, Scorer, similarity};
pub use synonyms::SynonymTable;
