//! Payload decoding helpers.
//!
//! Remote tools return row data in wildly different encodings: plain JSON,
//! JSON that was serialized into a string and escaped once more, or a payload
//! wrapped in an untrusted-content boundary marker with prose around it.
//! Everything here is best-effort and never fails: a value that cannot be
//! decoded is handed back unchanged so callers can fall through to raw text.

use serde_json::Value;

/// Opening tag prefix of the untrusted-content boundary marker.
const BOUNDARY_OPEN_PREFIX: &str = "<untrusted-data";
/// Closing tag prefix of the untrusted-content boundary marker.
const BOUNDARY_CLOSE_PREFIX: &str = "</untrusted-data";

/// Undo one layer of JSON string escaping.
///
/// Text that already looks like a JSON object or array is returned unchanged
/// (decoding valid JSON a second time would corrupt it). Otherwise the text
/// is parsed as a JSON string literal; success counts only when that parse
/// actually removed an escape layer, so plain prose yields `None` rather than
/// a pointless copy of itself.
pub fn decode_escaped_json(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'))
    {
        return Some(text.to_string());
    }

    let decoded = serde_json::from_str::<String>(&format!("\"{}\"", trimmed)).ok()?;
    if decoded == trimmed {
        return None;
    }
    Some(decoded)
}

/// Strip surrounding double quotes (and whitespace) from both ends.
pub fn strip_surrounding_quotes(text: &str) -> &str {
    text.trim().trim_matches('"').trim()
}

/// Extract the real payload from text wrapped in an untrusted-content
/// boundary marker.
///
/// When a closing tag exists, the content between the tag pair is returned.
/// When only the opening tag exists (truncated output), everything after it
/// is returned. Without boundary tags, the slice between the first `[`/`{`
/// and the last matching `]`/`}` is returned, which tolerates prose around an
/// embedded JSON blob. Residual surrounding quotes are stripped in all cases.
pub fn strip_boundary_artifacts(value: &str) -> String {
    let trimmed = value.trim();

    if let Some(open_start) = trimmed.find(BOUNDARY_OPEN_PREFIX) {
        if let Some(open_len) = trimmed[open_start..].find('>') {
            let after_open = &trimmed[open_start + open_len + 1..];
            let inner = match after_open.find(BOUNDARY_CLOSE_PREFIX) {
                Some(close_start) => &after_open[..close_start],
                None => after_open,
            };
            return strip_surrounding_quotes(inner).to_string();
        }
    }

    if let Some(start) = trimmed.find(['[', '{']) {
        let close = if trimmed.as_bytes()[start] == b'[' {
            ']'
        } else {
            '}'
        };
        if let Some(end) = trimmed.rfind(close) {
            if end > start {
                return strip_surrounding_quotes(&trimmed[start..=end]).to_string();
            }
        }
    }

    strip_surrounding_quotes(trimmed).to_string()
}

/// Normalize a row payload that may have arrived as encoded text.
///
/// Non-string values pass through untouched. A string is trimmed, unquoted,
/// de-escaped, stripped of boundary artifacts, and parsed as JSON; when the
/// final parse fails the original string is returned unchanged, because the
/// payload may legitimately be prose (a scalar answer, a natural-language
/// reply). Whitespace-only input normalizes to an empty array.
pub fn normalize_rows_payload(rows: Value) -> Value {
    let Value::String(text) = rows else {
        return rows;
    };

    let stripped = strip_surrounding_quotes(&text);
    if stripped.is_empty() {
        return Value::Array(Vec::new());
    }

    let decoded = decode_escaped_json(stripped).unwrap_or_else(|| stripped.to_string());
    let candidate = strip_boundary_artifacts(&decoded);
    match serde_json::from_str(&candidate) {
        Ok(value) => value,
        Err(_) => Value::String(text),
    }
}
