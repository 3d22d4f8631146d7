//! Report rendering
//!
//! Text output: for each report a `# Title` line, the table with every column
//! right-aligned to its widest cell, then a blank line. No index column.
//! JSON output: one document with every report's columns and rows.

use super::aggregator::ReportSet;
use crate::models::{ReportTable, Value};
use chrono::{DateTime, Local};
use mla_common::Result;
use serde::Serialize;

/// Gap between adjacent columns
const COLUMN_SEPARATOR: &str = "  ";
/// Body line of a report without rows
const EMPTY_TABLE_MARKER: &str = "(no rows)";

/// Render one table as aligned plain text (no trailing newline)
pub fn render_table(table: &ReportTable) -> String {
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(Value::to_string).collect())
        .collect();

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_line = |fields: &[String]| -> String {
        fields
            .iter()
            .zip(&widths)
            .map(|(field, width)| format!("{:>width$}", field, width = *width))
            .collect::<Vec<_>>()
            .join(COLUMN_SEPARATOR)
    };

    let mut lines = vec![format_line(&table.columns)];
    if cells.is_empty() {
        lines.push(EMPTY_TABLE_MARKER.to_string());
    }
    lines.extend(cells.iter().map(|row| format_line(row)));
    lines.join("\n")
}

/// Render every report into the text document
pub fn render_text(reports: &ReportSet) -> String {
    let mut out = String::new();
    for (name, table) in reports {
        out.push_str("# ");
        out.push_str(&name.title());
        out.push('\n');
        out.push_str(&render_table(table));
        out.push_str("\n\n");
    }
    out
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    generated_at: String,
    reports: Vec<JsonReport<'a>>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    name: &'static str,
    title: String,
    columns: &'a [String],
    rows: &'a [Vec<Value>],
}

/// Render every report into one pretty-printed JSON document
pub fn render_json(reports: &ReportSet, generated_at: &DateTime<Local>) -> Result<String> {
    let document = JsonDocument {
        generated_at: generated_at.to_rfc3339(),
        reports: reports
            .iter()
            .map(|(name, table)| JsonReport {
                name: name.as_str(),
                title: name.title(),
                columns: &table.columns,
                rows: &table.rows,
            })
            .collect(),
    };
    let mut json = serde_json::to_string_pretty(&document)?;
    json.push('\n');
    Ok(json)
}
