//! Schema summarization.
//!
//! Collapses raw introspection rows into one line per table:
//! `users(id:uuid, email:text)`. The summary is what actually reaches the
//! chat model's system prompt, so it must stay compact and deterministic.

use crate::models::JsonMap;
use serde_json::Value;
use std::collections::HashMap;

/// Field names that may carry the table name, in resolution order.
const TABLE_KEYS: &[&str] = &["table_name", "table", "name"];
/// Field names that may carry the column name, in resolution order.
const COLUMN_KEYS: &[&str] = &["column_name", "column"];
/// Field names that may carry the column type, in resolution order.
const TYPE_KEYS: &[&str] = &["data_type", "udt_name", "type"];

fn first_string<'a>(row: &'a JsonMap, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| row.get(*key).and_then(Value::as_str))
}

/// Summarize introspection rows into a per-table column listing.
///
/// Returns `None` for non-sequence input. Rows lacking a resolvable table or
/// column are skipped silently; tables appear in first-seen order. An
/// existing but empty (or entirely skipped) sequence yields an empty string,
/// not `None`.
pub fn summarize_schema_rows(rows: &Value) -> Option<String> {
    let rows = rows.as_array()?;

    let mut table_order: Vec<String> = Vec::new();
    let mut table_columns: HashMap<String, Vec<String>> = HashMap::new();

    for row in rows {
        let Some(row) = row.as_object() else {
            continue;
        };
        let Some(table) = first_string(row, TABLE_KEYS) else {
            continue;
        };
        let Some(column) = first_string(row, COLUMN_KEYS) else {
            continue;
        };

        let rendered = match first_string(row, TYPE_KEYS) {
            Some(data_type) => format!("{}:{}", column, data_type),
            None => column.to_string(),
        };

        if !table_columns.contains_key(table) {
            table_order.push(table.to_string());
        }
        table_columns
            .entry(table.to_string())
            .or_default()
            .push(rendered);
    }

    let lines: Vec<String> = table_order
        .iter()
        .map(|table| format!("{}({})", table, table_columns[table].join(", ")))
        .collect();

    Some(lines.join("\n"))
}
