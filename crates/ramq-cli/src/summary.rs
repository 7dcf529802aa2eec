use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ramq_model::Severity;

use crate::commands::RunResult;

pub fn print_summary(result: &RunResult) {
    let report = &result.report;
    println!("Run: {}", report.run_id);
    println!("Records validated: {}", result.record_count);
    if let Some(path) = &result.report_path {
        println!("Run report: {}", path.display());
    }

    if report.violations.is_empty() {
        println!("No violations found.");
    } else {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL_CONDENSED)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            header_cell("Rule"),
            header_cell("Severity"),
            header_cell("Record"),
            header_cell("Records"),
            header_cell("Message"),
        ]);
        for violation in &report.violations {
            table.add_row(vec![
                Cell::new(&violation.rule_id),
                severity_cell(violation.severity),
                Cell::new(violation.record_id.as_deref().unwrap_or("-")),
                Cell::new(violation.affected_record_ids.len())
                    .set_alignment(CellAlignment::Right),
                Cell::new(&violation.message),
            ]);
        }
        println!("{table}");
    }

    for diagnostic in &report.diagnostics {
        println!("note [{}]: {}", diagnostic.rule_id, diagnostic.message);
    }
    for failure in &report.failures {
        println!("failed [{}]: {}", failure.rule_id, failure.error);
    }
    println!(
        "{} error(s), {} warning(s), {} rule failure(s)",
        report.error_count(),
        report.warning_count(),
        report.failures.len()
    );
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("error").fg(Color::Red),
        Severity::Warning => Cell::new("warning").fg(Color::Yellow),
    }
}
