use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::{info, info_span, warn};

use fieldmap_classify::{ClassificationSearcher, SearchOptions, SearchOutcome, TreeOptions, parse_tree};
use fieldmap_match::form::extract_field_names;
use fieldmap_match::{MappingMemory, MatchEngine, MemoryEntry, ScoreConfig, SynonymTable};
use fieldmap_model::{MappingResult, TargetSchema};

use crate::cli::{ClassifyArgs, MapArgs, MemoryArgs};

/// Outcome of the `map` command, for summary printing.
pub struct MapOutcome {
    pub schema_name: String,
    pub result: MappingResult,
    pub conflicts: Vec<(String, String)>,
}

pub fn run_map(args: &MapArgs) -> Result<MapOutcome> {
    let span = info_span!("map", fields_file = %args.fields.display());
    let _guard = span.enter();
    let start = Instant::now();

    let source_fields = load_source_fields(&args.fields)?;
    let schema = load_schema(&args.schema)?;
    let schema_name = schema.name.clone();
    info!(
        source_fields = source_fields.len(),
        target_fields = schema.len(),
        schema = %schema_name,
        "inputs loaded"
    );

    let engine = MatchEngine::with_config(schema, score_config(args.floor, args.synonym_confidence));
    let memory = args
        .memory
        .as_deref()
        .map(MappingMemory::load_or_degraded);

    let result = engine.resolve(&source_fields, memory.as_ref());
    info!(
        assigned = result.assignments.len(),
        unresolved_sources = result.unresolved_sources.len(),
        unresolved_targets = result.unresolved_targets.len(),
        duration_ms = start.elapsed().as_millis(),
        "resolution complete"
    );

    let mut conflicts = Vec::new();
    if args.confirm
        && let (Some(path), Some(memory)) = (args.memory.as_deref(), memory.as_ref())
    {
        conflicts = engine.confirm_result(&result, memory);
        for (token, existing) in &conflicts {
            warn!(token = %token, existing = %existing, "memory conflict, not overwritten");
        }
        memory.flush(path)?;
        info!(entries = memory.len(), path = %path.display(), "memory flushed");
    }

    if let Some(output) = &args.output {
        let config = result.to_config(&schema_name);
        let json = serde_json::to_string_pretty(&config).context("serialize mapping config")?;
        fs::write(output, json)
            .with_context(|| format!("write mapping config to {}", output.display()))?;
        info!(path = %output.display(), "mapping config written");
    }

    Ok(MapOutcome {
        schema_name,
        result,
        conflicts,
    })
}

pub fn run_classify(args: &ClassifyArgs) -> Result<SearchOutcome> {
    let span = info_span!("classify", tree_file = %args.tree.display());
    let _guard = span.enter();

    let value = read_json(&args.tree)?;
    let tree_options = if args.child_keys.is_empty() {
        TreeOptions::default()
    } else {
        TreeOptions {
            child_keys: args.child_keys.clone(),
        }
    };
    let tree = parse_tree(&value, &tree_options)
        .with_context(|| format!("parse classification tree from {}", args.tree.display()))?;
    for issue in &tree.issues {
        warn!(location = %issue.location, reason = %issue.reason, "skipped malformed node");
    }
    info!(nodes = tree.node_count(), roots = tree.roots.len(), "tree loaded");

    let mut searcher = ClassificationSearcher::new(SearchOptions {
        score: score_config(args.floor, None),
        limit: Some(args.limit),
        trace: args.trace,
    });
    if let Some(path) = &args.synonyms {
        searcher = searcher.with_synonyms(load_label_synonyms(path)?);
    }

    let outcome = searcher.search_forest(&tree.roots, &args.query);
    info!(matches = outcome.matches.len(), query = %args.query, "search complete");
    Ok(outcome)
}

pub fn run_memory(args: &MemoryArgs) -> Result<Vec<MemoryEntry>> {
    let memory = MappingMemory::load(&args.store)?;
    Ok(memory.entries_snapshot())
}

fn score_config(floor: Option<f32>, synonym_confidence: Option<f32>) -> ScoreConfig {
    let mut config = ScoreConfig::default();
    if let Some(floor) = floor {
        config.floor = floor;
    }
    if let Some(confidence) = synonym_confidence {
        config.synonym_confidence = confidence;
    }
    config
}

fn read_json(path: &Path) -> Result<Value> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse JSON from {}", path.display()))
}

/// Load source field names: a JSON array of strings, or a form schema whose
/// data-bearing elements are extracted.
fn load_source_fields(path: &Path) -> Result<Vec<String>> {
    let value = read_json(path)?;
    let fields = match &value {
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => extract_field_names(&value),
    };
    if fields.is_empty() {
        bail!("no source fields found in {}", path.display());
    }
    Ok(fields)
}

fn load_schema(path: &Path) -> Result<TargetSchema> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let schema: TargetSchema = serde_json::from_str(&contents)
        .with_context(|| format!("parse target schema from {}", path.display()))?;
    // Re-validate: serde bypasses the constructor's checks.
    TargetSchema::new(schema.name, schema.fields)
        .with_context(|| format!("invalid target schema in {}", path.display()))
}

fn load_label_synonyms(path: &Path) -> Result<SynonymTable> {
    let value = read_json(path)?;
    let Value::Object(map) = value else {
        bail!(
            "label synonyms in {} must be an object of label to synonym list",
            path.display()
        );
    };
    let mut table = SynonymTable::default();
    for (label, synonyms) in &map {
        let Value::Array(items) = synonyms else {
            bail!("synonyms for '{label}' must be an array");
        };
        for synonym in items.iter().filter_map(Value::as_str) {
            table.insert(label, synonym);
        }
    }
    Ok(table)
}
