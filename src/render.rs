//! Row rendering for presentation consumers.
//!
//! A normalized row payload is either a sequence of plain objects (rendered
//! as a table whose columns are the union of all observed keys, in
//! first-seen order) or any other JSON value (rendered as formatted JSON
//! text). Cell rendering: null becomes the literal "null", a missing key
//! becomes an empty cell, primitives use their string form, and anything
//! else is JSON-stringified.

use crate::models::JsonMap;
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

/// Extract the plain-object rows of an array payload, in original order.
///
/// Returns `None` for non-array input; an empty array maps to an empty
/// vector, not `None`. Non-object elements of a mixed array are dropped.
pub fn extract_tabular_rows(rows: &Value) -> Option<Vec<JsonMap>> {
    let rows = rows.as_array()?;
    Some(
        rows.iter()
            .filter_map(|row| row.as_object().cloned())
            .collect(),
    )
}

/// Union of all observed keys across rows, in first-seen order.
pub fn collect_columns(rows: &[JsonMap]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// Render a single cell value.
pub fn render_cell(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(composite) => serde_json::to_string(composite).unwrap_or_default(),
    }
}

/// Render a row payload for display: aligned text table for tabular data,
/// pretty-printed JSON for everything else.
pub fn render_rows(rows: &Value) -> String {
    match extract_tabular_rows(rows) {
        Some(tabular) => format_as_table(&tabular),
        None => serde_json::to_string_pretty(rows).unwrap_or_default(),
    }
}

/// Render tabular rows as an aligned ASCII table.
pub fn format_as_table(rows: &[JsonMap]) -> String {
    let columns = collect_columns(rows);
    if columns.is_empty() {
        return "Empty set".to_string();
    }

    let mut widths: Vec<usize> = columns.iter().map(|c| c.width()).collect();
    for row in rows {
        for (i, column) in columns.iter().enumerate() {
            let cell_width = render_cell(row.get(column)).width();
            widths[i] = widths[i].max(cell_width);
        }
    }

    let mut output = String::new();
    let separator: String = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(w + 2)))
        .collect::<String>()
        + "+\n";

    output.push_str(&separator);
    let header: String = columns
        .iter()
        .zip(&widths)
        .map(|(column, w)| format!("| {:^width$} ", column, width = w))
        .collect::<String>()
        + "|\n";
    output.push_str(&header);
    output.push_str(&separator);

    for row in rows {
        let line: String = columns
            .iter()
            .zip(&widths)
            .map(|(column, w)| {
                let value = row.get(column);
                let rendered = render_cell(value);
                if matches!(value, Some(Value::Number(_))) {
                    format!("| {:>width$} ", rendered, width = w)
                } else {
                    format!("| {:<width$} ", rendered, width = w)
                }
            })
            .collect::<String>()
            + "|\n";
        output.push_str(&line);
    }

    output.push_str(&separator);
    let row_text = if rows.len() == 1 { "row" } else { "rows" };
    output.push_str(&format!("{} {} in set\n", rows.len(), row_text));

    output
}

/// Render tabular rows as a markdown table.
pub fn format_as_markdown(rows: &[JsonMap]) -> String {
    let columns = collect_columns(rows);
    if columns.is_empty() {
        return "*Empty set*".to_string();
    }

    let mut output = String::new();

    let header: String = columns
        .iter()
        .map(|c| format!("| {} ", c))
        .collect::<String>()
        + "|\n";
    output.push_str(&header);

    let separator: String = columns.iter().map(|_| "|---").collect::<String>() + "|\n";
    output.push_str(&separator);

    for row in rows {
        let line: String = columns
            .iter()
            .map(|column| format!("| {} ", render_cell(row.get(column))))
            .collect::<String>()
            + "|\n";
        output.push_str(&line);
    }

    output.push_str(&format!("\n*{} rows*", rows.len()));

    output
}
