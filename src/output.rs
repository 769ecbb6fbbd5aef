//! Terminal Table Output
//!
//! View handlers print their result sets as box-drawn tables with a leading
//! `(index)` column:
//!
//! ```text
//! ┌─────────┬────┬─────────────┐
//! │ (index) │ id │ name        │
//! ├─────────┼────┼─────────────┤
//! │ 0       │ 1  │ Engineering │
//! └─────────┴────┴─────────────┘
//! ```
//!
//! Cells are rendered without transformation: strings verbatim, numbers as
//! the driver returned them, SQL NULL as `null`.

use crate::engine::TableView;

const INDEX_HEADER: &str = "(index)";

/// Render a single cell value
#[must_use]
pub fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render a result set as a box-drawn table, one trailing newline included
#[must_use]
pub fn render_table(view: &TableView) -> String {
    let mut header = Vec::with_capacity(view.columns.len() + 1);
    header.push(INDEX_HEADER.to_string());
    header.extend(view.columns.iter().cloned());

    let body: Vec<Vec<String>> = view
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let mut cells = Vec::with_capacity(row.len() + 1);
            cells.push(idx.to_string());
            cells.extend(row.iter().map(cell_text));
            cells
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&rule(&widths, '┌', '┬', '┐'));
    out.push_str(&line(&widths, &header));
    out.push_str(&rule(&widths, '├', '┼', '┤'));
    for row in &body {
        out.push_str(&line(&widths, row));
    }
    out.push_str(&rule(&widths, '└', '┴', '┘'));
    out
}

fn rule(widths: &[usize], left: char, middle: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}\n", segments.join(&middle.to_string()))
}

fn line(widths: &[usize], cells: &[String]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(idx, width)| {
            let cell = cells.get(idx).map_or("", String::as_str);
            let pad = width - cell.chars().count();
            format!(" {cell}{} ", " ".repeat(pad))
        })
        .collect();
    format!("│{}│\n", padded.join("│"))
}
