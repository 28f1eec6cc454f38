//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "fieldmap",
    version,
    about = "Field and classification matching for field-data exports",
    long_about = "Map source form fields onto a fixed destination schema with\n\
                  confidence scoring and learned mappings, and resolve free-text\n\
                  classification labels against hierarchical taxonomies."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve source field names onto a target schema.
    Map(MapArgs),

    /// Search a classification tree for a query label.
    Classify(ClassifyArgs),

    /// List the learned mappings in a memory store.
    Memory(MemoryArgs),
}

#[derive(Parser)]
pub struct MapArgs {
    /// Source fields: a JSON array of names, or a form schema whose
    /// data-bearing elements are extracted.
    #[arg(value_name = "FIELDS_FILE")]
    pub fields: PathBuf,

    /// Target schema JSON (name, fields, optional per-field synonyms).
    #[arg(long = "schema", value_name = "PATH")]
    pub schema: PathBuf,

    /// Mapping memory store. Read before scoring; unreadable stores degrade
    /// to memory-less resolution with a warning.
    #[arg(long = "memory", value_name = "PATH")]
    pub memory: Option<PathBuf>,

    /// Confirm accepted assignments into the memory store and flush it.
    #[arg(long = "confirm", requires = "memory")]
    pub confirm: bool,

    /// Write the resolved mapping config as JSON.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Minimum fuzzy similarity for a candidate pair (default 0.5).
    #[arg(long = "floor", value_name = "SCORE")]
    pub floor: Option<f32>,

    /// Confidence assigned to synonym matches (default 0.85).
    #[arg(long = "synonym-confidence", value_name = "SCORE")]
    pub synonym_confidence: Option<f32>,
}

#[derive(Parser)]
pub struct ClassifyArgs {
    /// Classification tree JSON (single root object or array of roots).
    #[arg(value_name = "TREE_FILE")]
    pub tree: PathBuf,

    /// Label to search for.
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Keep only the top N results.
    #[arg(long = "limit", value_name = "N", default_value_t = 5)]
    pub limit: usize,

    /// Child-container key to recognize; repeatable. Defaults to
    /// children, child_classifications, items, choices.
    #[arg(long = "child-key", value_name = "KEY")]
    pub child_keys: Vec<String>,

    /// Label synonyms JSON: object of label to synonym list.
    #[arg(long = "synonyms", value_name = "PATH")]
    pub synonyms: Option<PathBuf>,

    /// Minimum fuzzy similarity for a node to rank (default 0.5).
    #[arg(long = "floor", value_name = "SCORE")]
    pub floor: Option<f32>,

    /// Print the per-node visit trace after the results.
    #[arg(long = "trace")]
    pub trace: bool,
}

#[derive(Parser)]
pub struct MemoryArgs {
    /// Mapping memory store to list.
    #[arg(value_name = "STORE_FILE")]
    pub store: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
