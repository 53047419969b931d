use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use referable_ingest::RowPreview;
use referable_map::MappingState;
use referable_model::{ImportSummary, LogicalField};

pub fn print_mapping(file_name: &str, state: &MappingState) {
    println!("File: {file_name}");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Label"),
        header_cell("Required"),
        header_cell("Header"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);

    for field in LogicalField::REQUIRED
        .into_iter()
        .chain(LogicalField::OPTIONAL)
    {
        let header = match state.mapped_header(field) {
            Some(header) => Cell::new(header).fg(Color::Green),
            None if field.is_required() => Cell::new("(not mapped)")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
            None => dim_cell("(not mapped)"),
        };
        table.add_row(vec![
            Cell::new(field.name()),
            Cell::new(field.label()),
            if field.is_required() {
                Cell::new("yes")
            } else {
                dim_cell("no")
            },
            header,
        ]);
    }
    println!("{table}");

    if state.extra_fields().is_empty() {
        println!("Extra columns: none");
    } else {
        println!("Extra columns: {}", state.extra_fields().join(", "));
    }

    let summary = state.summary();
    println!(
        "Required: {}/{} mapped, optional: {}/{} mapped",
        summary.required_mapped,
        summary.required_total,
        summary.optional_mapped,
        summary.optional_total
    );
    if state.can_submit() {
        println!("Ready to import.");
    } else {
        let missing: Vec<&str> = state
            .missing_required()
            .iter()
            .map(LogicalField::name)
            .collect();
        println!("Not ready: map {} to continue.", missing.join(", "));
    }
}

pub fn print_preview(rows: &[RowPreview], fields: &[LogicalField]) {
    if rows.is_empty() {
        println!("No data rows to preview.");
        return;
    }
    let mut table = Table::new();
    let mut header = vec![header_cell("Line")];
    header.extend(fields.iter().map(|field| header_cell(field.name())));
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);

    for row in rows {
        let mut cells = vec![dim_cell(row.line)];
        cells.extend(fields.iter().map(|field| {
            row.values
                .get(field)
                .filter(|value| !value.is_empty())
                .map_or_else(|| dim_cell("-"), Cell::new)
        }));
        table.add_row(cells);
    }
    println!("{table}");
}

pub fn print_import_summary(file_name: &str, summary: &ImportSummary) {
    println!("Imported: {file_name}");
    let mut table = Table::new();
    table.set_header(vec![header_cell("Processed"), header_cell("Skipped")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new(summary.processed).fg(Color::Green),
        count_cell(summary.skipped, Color::Yellow),
    ]);
    println!("{table}");

    if summary.has_errors() {
        let mut errors = Table::new();
        errors.set_header(vec![header_cell("#"), header_cell("Row error")]);
        apply_table_style(&mut errors);
        align_column(&mut errors, 0, CellAlignment::Right);
        for (idx, message) in summary.errors.iter().enumerate() {
            errors.add_row(vec![dim_cell(idx + 1), Cell::new(message).fg(Color::Red)]);
        }
        println!("{errors}");
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(color)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
