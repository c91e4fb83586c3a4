use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use bom_ingest::LoadedBatch;
use bom_model::{RowIssue, RowKind};
use bom_upload::{SkipReason, UploadReport};

const KINDS: [RowKind; 5] = [
    RowKind::System,
    RowKind::Assembly,
    RowKind::Part,
    RowKind::Step,
    RowKind::Undefined,
];

/// Row counts per kind plus the invalid-row table, if any.
pub fn print_batch_summary(batch: &LoadedBatch) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Kind"),
        header_cell("Rows"),
        header_cell("Invalid"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for kind in KINDS {
        let rows = batch.count_kind(kind);
        if rows == 0 {
            continue;
        }
        let invalid = batch.issues.iter().filter(|issue| issue.kind == kind).count();
        table.add_row(vec![
            kind_cell(kind),
            Cell::new(rows),
            count_cell(invalid, Color::Red),
        ]);
    }
    table.add_row(vec![
        total_cell(),
        Cell::new(batch.rows.len()).add_attribute(Attribute::Bold),
        count_cell(batch.error_count(), Color::Red).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_issue_table(&batch.issues);
}

fn print_issue_table(issues: &[RowIssue]) {
    if issues.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Kind"),
        header_cell("Identifier"),
        header_cell("Error"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for issue in issues {
        table.add_row(vec![
            Cell::new(issue.position),
            kind_cell(issue.kind),
            Cell::new(&issue.identifier),
            Cell::new(issue.message()).fg(Color::Red),
        ]);
    }
    println!();
    println!("Invalid rows:");
    println!("{table}");
}

/// Uploaded and skipped counts, then one line per skipped row.
pub fn print_upload_summary(report: &UploadReport) {
    if let Some(label) = &report.snapshot_label {
        println!("Snapshot: {label}");
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Kind"),
        header_cell("Uploaded"),
        header_cell("Skipped"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for kind in [RowKind::Part, RowKind::Step] {
        table.add_row(vec![
            kind_cell(kind),
            count_cell(report.count(kind, true), Color::Green),
            count_cell(report.count(kind, false), Color::Red),
        ]);
    }
    table.add_row(vec![
        total_cell(),
        count_cell(report.uploaded_count(), Color::Green).add_attribute(Attribute::Bold),
        count_cell(report.skipped_count(), Color::Red).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_skipped_table(report);
}

fn print_skipped_table(report: &UploadReport) {
    if report.is_complete() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Kind"),
        header_cell("Identifier"),
        header_cell("Reason"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (row, reason) in report.skipped() {
        table.add_row(vec![
            Cell::new(row.position),
            kind_cell(row.kind),
            Cell::new(&row.identifier),
            reason_cell(reason),
        ]);
    }
    println!();
    println!("Skipped rows:");
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 4 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Fixed(10)),
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
            ColumnConstraint::UpperBoundary(Width::Percentage(60)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn total_cell() -> Cell {
    Cell::new("TOTAL")
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn kind_cell(kind: RowKind) -> Cell {
    match kind {
        RowKind::Part => Cell::new(kind)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        RowKind::Undefined => Cell::new(kind).fg(Color::Red),
        _ => Cell::new(kind),
    }
}

fn reason_cell(reason: &SkipReason) -> Cell {
    match reason {
        // Consequence of an earlier failure rather than a failure of its own.
        SkipReason::NoParentPart => dim_cell(reason),
        _ => Cell::new(reason).fg(Color::Red),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
