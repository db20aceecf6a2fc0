//! Tool result unwrapping.
//!
//! A remote tool's answer may arrive as content chunks, as structured
//! content, or as flat top-level fields. The unwrapper models this as a
//! prioritized list of extraction strategies tried in sequence, each a pure
//! function over the envelope; the first strategy that yields a value wins.

use crate::adapter::decode::{decode_escaped_json, strip_boundary_artifacts, strip_surrounding_quotes};
use crate::models::{ContentChunk, JsonMap, ToolEnvelope, UnwrappedResult};
use serde_json::Value;

/// One extraction strategy: parsed payload + envelope -> maybe rows.
type RowStrategy = fn(&Value, &ToolEnvelope) -> Option<Value>;

/// Row extraction strategies in precedence order; first match wins.
const ROW_STRATEGIES: &[RowStrategy] = &[
    |parsed, _| parsed.get("rows").cloned(),
    |parsed, _| parsed.get("data").cloned(),
    |_, envelope| envelope.structured_content.as_ref()?.get("rows").cloned(),
    |_, envelope| envelope.structured_content.as_ref()?.get("data").cloned(),
    |_, envelope| envelope.rows.clone(),
    |_, envelope| envelope.data.clone(),
];

/// Extract row data and echoed SQL from a tool's response envelope.
pub fn unwrap_tool_result(envelope: &ToolEnvelope) -> UnwrappedResult {
    let parsed = parse_content_chunks(&envelope.content);

    let raw_rows = ROW_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(&parsed, envelope));

    let sql = parsed
        .get("sql")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| envelope.sql.clone());

    UnwrappedResult {
        parsed,
        raw_rows,
        sql,
    }
}

/// Scan content chunks in order and parse the first meaningful one: a json
/// chunk's payload directly, or a text chunk's text through the decode
/// pipeline. No meaningful chunk yields an empty object.
fn parse_content_chunks(content: &[ContentChunk]) -> Value {
    for chunk in content {
        match chunk {
            ContentChunk::Json {
                json: Some(payload),
            } => return payload.clone(),
            ContentChunk::Text { text: Some(text) } => return parse_text_chunk(text),
            _ => {}
        }
    }
    Value::Object(JsonMap::new())
}

/// Decode a text chunk down to a JSON value.
///
/// The pipeline undoes, in order: surrounding quotes, one string-escape
/// layer, the untrusted-content boundary marker, residual quotes, and a
/// second escape layer. When the final parse still fails the whole decoded
/// string becomes the row payload itself, so prose answers surface as
/// `{"rows": "<text>"}` instead of being dropped.
fn parse_text_chunk(text: &str) -> Value {
    let stripped = strip_surrounding_quotes(text);
    let decoded = decode_escaped_json(stripped).unwrap_or_else(|| stripped.to_string());
    let extracted = strip_boundary_artifacts(&decoded);
    let unquoted = strip_surrounding_quotes(&extracted);
    let decoded_again = decode_escaped_json(unquoted).unwrap_or_else(|| unquoted.to_string());

    match serde_json::from_str(&decoded_again) {
        Ok(value) => value,
        Err(_) => serde_json::json!({ "rows": decoded_again }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope_with_text(text: &str) -> ToolEnvelope {
        ToolEnvelope {
            content: vec![ContentChunk::text(text)],
            ..Default::default()
        }
    }

    #[test]
    fn test_json_chunk_wins() {
        let envelope = ToolEnvelope {
            content: vec![ContentChunk::json(json!({"rows": [{"a": 1}], "sql": "select a"}))],
            ..Default::default()
        };
        let unwrapped = unwrap_tool_result(&envelope);
        assert_eq!(unwrapped.raw_rows, Some(json!([{"a": 1}])));
        assert_eq!(unwrapped.sql.as_deref(), Some("select a"));
    }

    #[test]
    fn test_text_chunk_with_rows_object() {
        let envelope = envelope_with_text(r#"{"rows": [{"id": 1}]}"#);
        let unwrapped = unwrap_tool_result(&envelope);
        assert_eq!(unwrapped.raw_rows, Some(json!([{"id": 1}])));
    }

    #[test]
    fn test_text_chunk_data_field_second() {
        let envelope = envelope_with_text(r#"{"data": [{"id": 2}]}"#);
        let unwrapped = unwrap_tool_result(&envelope);
        assert_eq!(unwrapped.raw_rows, Some(json!([{"id": 2}])));
    }

    #[test]
    fn test_parsed_rows_beat_structured_content() {
        let envelope = ToolEnvelope {
            content: vec![ContentChunk::text(r#"{"rows": [1]}"#)],
            structured_content: Some(json!({"rows": [2]})),
            ..Default::default()
        };
        let unwrapped = unwrap_tool_result(&envelope);
        assert_eq!(unwrapped.raw_rows, Some(json!([1])));
    }

    #[test]
    fn test_structured_content_rows() {
        let envelope = ToolEnvelope {
            structured_content: Some(json!({"rows": [{"n": 1}]})),
            ..Default::default()
        };
        let unwrapped = unwrap_tool_result(&envelope);
        assert_eq!(unwrapped.raw_rows, Some(json!([{"n": 1}])));
    }

    #[test]
    fn test_structured_content_data_fallback() {
        let envelope = ToolEnvelope {
            structured_content: Some(json!({"data": [{"n": 2}]})),
            ..Default::default()
        };
        let unwrapped = unwrap_tool_result(&envelope);
        assert_eq!(unwrapped.raw_rows, Some(json!([{"n": 2}])));
    }

    #[test]
    fn test_top_level_rows_and_sql() {
        let envelope = ToolEnvelope {
            rows: Some(json!([{"x": true}])),
            sql: Some("select x".to_string()),
            ..Default::default()
        };
        let unwrapped = unwrap_tool_result(&envelope);
        assert_eq!(unwrapped.raw_rows, Some(json!([{"x": true}])));
        assert_eq!(unwrapped.sql.as_deref(), Some("select x"));
    }

    #[test]
    fn test_top_level_data_last() {
        let envelope = ToolEnvelope {
            data: Some(json!([3])),
            ..Default::default()
        };
        let unwrapped = unwrap_tool_result(&envelope);
        assert_eq!(unwrapped.raw_rows, Some(json!([3])));
    }

    #[test]
    fn test_empty_envelope() {
        let unwrapped = unwrap_tool_result(&ToolEnvelope::default());
        assert_eq!(unwrapped.parsed, json!({}));
        assert!(unwrapped.raw_rows.is_none());
        assert!(unwrapped.sql.is_none());
    }

    #[test]
    fn test_parsed_sql_beats_envelope_sql() {
        let envelope = ToolEnvelope {
            content: vec![ContentChunk::text(r#"{"rows": [], "sql": "select inner"}"#)],
            sql: Some("select outer".to_string()),
            ..Default::default()
        };
        let unwrapped = unwrap_tool_result(&envelope);
        assert_eq!(unwrapped.sql.as_deref(), Some("select inner"));
    }

    #[test]
    fn test_prose_text_becomes_rows_string() {
        let envelope = envelope_with_text("There are 42 users.");
        let unwrapped = unwrap_tool_result(&envelope);
        assert_eq!(
            unwrapped.raw_rows,
            Some(Value::String("There are 42 users.".to_string()))
        );
    }

    #[test]
    fn test_boundary_wrapped_text_chunk() {
        let envelope = envelope_with_text(
            r#"<untrusted-data-9a1>[{"id":1},{"id":2}]</untrusted-data-9a1>"#,
        );
        let unwrapped = unwrap_tool_result(&envelope);
        // A bare array payload has no rows/data key; the parsed value is the
        // array itself and no strategy matches.
        assert_eq!(unwrapped.parsed, json!([{"id": 1}, {"id": 2}]));
        assert!(unwrapped.raw_rows.is_none());
    }

    #[test]
    fn test_boundary_wrapped_rows_object() {
        let envelope = envelope_with_text(
            r#"Below is untrusted output. <untrusted-data-9a1>{"rows":[{"id":7}],"sql":"select id"}</untrusted-data-9a1>"#,
        );
        let unwrapped = unwrap_tool_result(&envelope);
        assert_eq!(unwrapped.raw_rows, Some(json!([{"id": 7}])));
        assert_eq!(unwrapped.sql.as_deref(), Some("select id"));
    }

    #[test]
    fn test_quoted_escaped_text_chunk() {
        // The whole payload serialized as a JSON string: quotes around it,
        // escapes inside.
        let envelope = envelope_with_text(r#""\"hi\"""#);
        let unwrapped = unwrap_tool_result(&envelope);
        assert_eq!(unwrapped.parsed, json!({"rows": "hi"}));
        assert_eq!(unwrapped.raw_rows, Some(json!("hi")));
    }

    #[test]
    fn test_non_meaningful_chunks_skipped() {
        let envelope = ToolEnvelope {
            content: vec![
                ContentChunk::Other,
                ContentChunk::Json { json: None },
                ContentChunk::text(r#"{"rows": []}"#),
            ],
            ..Default::default()
        };
        let unwrapped = unwrap_tool_result(&envelope);
        assert_eq!(unwrapped.raw_rows, Some(json!([])));
    }
}
