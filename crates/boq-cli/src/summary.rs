//! Terminal summary table for one audit run.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use boq_core::AuditOutcome;
use boq_model::Classification;

pub fn print_summary(outcome: &AuditOutcome) {
    let stats = &outcome.stats;
    println!("Catalog: {}", &outcome.meta.catalog_fingerprint[..12]);
    println!("Config:  {}", outcome.meta.config_name);
    println!(
        "Rows: {} raw, {} positions, {} sections, {} dropped, {} duplicates removed",
        stats.normalize.raw_total,
        outcome.positions.len(),
        stats.normalize.section_rows,
        stats.normalize.dropped_rows,
        stats.schema.duplicates_removed,
    );
    println!(
        "Matches: {} exact, {} partial, {} none, {} spec-linked",
        stats.enrich.exact, stats.enrich.partial, stats.enrich.none, stats.enrich.spec_linked,
    );

    let mut table = Table::new();
    table.set_header(vec![header_cell("Classification"), header_cell("Positions")]);
    apply_table_style(&mut table);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    for (classification, color) in [
        (Classification::Green, Color::Green),
        (Classification::Amber, Color::Yellow),
        (Classification::Red, Color::Red),
    ] {
        table.add_row(vec![
            Cell::new(classification).fg(color).add_attribute(Attribute::Bold),
            Cell::new(stats.count_of(classification)),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL").add_attribute(Attribute::Bold),
        Cell::new(outcome.positions.len()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}
