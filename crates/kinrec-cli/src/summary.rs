use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use kinrec_cli::pipeline::{MatchRun, MultisetRun};

pub fn print_match_summary(run: &MatchRun) {
    println!("Left: {}", run.report.left.path);
    println!("Right: {}", run.report.right.path);
    println!("Joined: {}", run.files.joined.display());
    println!("Report: {}", run.files.report.display());

    let summary = &run.report.summary;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Rows"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Matched pairs"), Cell::new(summary.matched)]);
    table.add_row(vec![
        Cell::new("Left only"),
        count_cell(summary.left_only, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Right only"),
        count_cell(summary.right_only, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Groups solved"),
        Cell::new(summary.groups_solved),
    ]);
    table.add_row(vec![
        Cell::new("Mean objective")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{:.3}", summary.mean_objective)).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    print_diagnostic_table(run);

    let unrecognized = run.report.unrecognized_units.len();
    if unrecognized > 0 {
        eprintln!(
            "{unrecognized} value(s) carried unrecognized units and were used unscaled; see {}",
            run.files.unrecognized.display()
        );
    }
}

fn print_diagnostic_table(run: &MatchRun) {
    if run.report.feedback.is_empty() {
        println!("No disagreements among matched pairs.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Diagnostic"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (kind, count) in &run.report.feedback {
        table.add_row(vec![
            Cell::new(kind),
            count_cell(*count, diagnostic_color(kind)),
        ]);
    }
    println!("{table}");
    println!("Diagnostics: {}", run.files.diagnostics.display());
}

pub fn print_multiset_summary(run: &MultisetRun) {
    println!("Output: {}", run.output.display());
    let matched = run
        .rows
        .iter()
        .filter(|row| row.value_left.is_some() && row.value_right.is_some())
        .count();
    let thousand_fold = run
        .rows
        .iter()
        .filter(|row| row.ratio.is_some_and(|r| is_near_power(r, 1000.0)))
        .count();

    let mut table = Table::new();
    table.set_header(vec![header_cell("Values"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Kind"), dim_cell(run.kind)]);
    table.add_row(vec![Cell::new("Rows"), Cell::new(run.rows.len())]);
    table.add_row(vec![Cell::new("Matched"), Cell::new(matched)]);
    table.add_row(vec![
        Cell::new("Unmatched"),
        count_cell(run.rows.len() - matched, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Off by 1000"),
        count_cell(thousand_fold, Color::Red),
    ]);
    println!("{table}");
}

fn is_near_power(ratio: f64, factor: f64) -> bool {
    let ratio = ratio.abs();
    ratio > 0.0 && ((ratio - factor).abs() / factor < 1e-6 || (ratio * factor - 1.0).abs() < 1e-6)
}

fn diagnostic_color(kind: &str) -> Color {
    match kind {
        "wrong_unit" => Color::Magenta,
        "off_by_factor" => Color::Red,
        _ => Color::Yellow,
    }
}

pub fn apply_table_style(table: &mut Table) {
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

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
