use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use fieldmap_match::MemoryEntry;
use fieldmap_model::{MatchBasis, SearchMatch, TraceEvent};

use crate::commands::MapOutcome;

pub fn print_map_summary(outcome: &MapOutcome) {
    println!("Schema: {}", outcome.schema_name);
    let result = &outcome.result;

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source Field"),
        header_cell("Target Field"),
        header_cell("Confidence"),
        header_cell("Basis"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for assignment in &result.assignments {
        table.add_row(vec![
            Cell::new(&assignment.source_field),
            Cell::new(&assignment.target_field),
            confidence_cell(assignment.confidence),
            basis_cell(assignment.basis),
        ]);
    }
    println!("{table}");

    if !result.unresolved_sources.is_empty() {
        println!("Unresolved source fields:");
        for field in &result.unresolved_sources {
            println!("- {field}");
        }
    }
    if !result.unresolved_targets.is_empty() {
        println!("Unresolved target fields:");
        for field in &result.unresolved_targets {
            println!("- {field}");
        }
    }
    if !result.invalid_fields.is_empty() {
        eprintln!("Rejected inputs:");
        for invalid in &result.invalid_fields {
            eprintln!("- {:?}: {}", invalid.raw, invalid.reason);
        }
    }
    if !outcome.conflicts.is_empty() {
        eprintln!("Memory conflicts (kept existing mapping):");
        for (token, existing) in &outcome.conflicts {
            eprintln!("- '{token}' already maps to '{existing}'");
        }
    }
}

pub fn print_search_results(matches: &[SearchMatch]) {
    if matches.is_empty() {
        println!("No matches above the confidence floor.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Label"),
        header_cell("Confidence"),
        header_cell("Basis"),
        header_cell("Depth"),
        header_cell("Path"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for (rank, result) in matches.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&result.label),
            confidence_cell(result.confidence),
            basis_cell(result.basis),
            Cell::new(result.depth),
            Cell::new(result.path_display()),
        ]);
    }
    println!("{table}");
}

pub fn print_trace(trace: &[TraceEvent]) {
    if trace.is_empty() {
        return;
    }
    println!();
    println!("Visit trace:");
    for event in trace {
        let score = match event.score {
            Some(score) => format!("{score:.3}"),
            None => "-".to_string(),
        };
        println!("{:indent$}{} [{}]", "", event.label, score, indent = event.depth * 2);
    }
}

pub fn print_memory_entries(entries: &[MemoryEntry]) {
    if entries.is_empty() {
        println!("Memory store is empty.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Token"),
        header_cell("Target Field"),
        header_cell("Confirmations"),
        header_cell("Last Confirmed"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.token),
            Cell::new(&entry.target_field),
            Cell::new(entry.confirmations),
            Cell::new(entry.last_confirmed.format("%Y-%m-%d %H:%M:%S")),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn confidence_cell(confidence: f32) -> Cell {
    let text = format!("{confidence:.2}");
    if confidence >= 0.95 {
        Cell::new(text).fg(Color::Green)
    } else if confidence >= 0.7 {
        Cell::new(text).fg(Color::Yellow)
    } else {
        Cell::new(text).fg(Color::Red)
    }
}

fn basis_cell(basis: MatchBasis) -> Cell {
    match basis {
        MatchBasis::Exact => Cell::new("exact").fg(Color::Green),
        MatchBasis::Memory => Cell::new("memory").fg(Color::Blue),
        MatchBasis::Synonym => Cell::new("synonym").fg(Color::Cyan),
        MatchBasis::Fuzzy => Cell::new("fuzzy").fg(Color::Yellow),
    }
}
