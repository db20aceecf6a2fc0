//! Tool response envelope models.
//!
//! A remote tool may answer with ordered content chunks, a structured-content
//! object, flat top-level fields, or any mix of the three. Every field here is
//! optional and unknown fields are ignored; the unwrapper decides which shape
//! actually carried the rows.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque envelope returned by a remote tool invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolEnvelope {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<ContentChunk>,
    #[serde(
        rename = "structuredContent",
        alias = "structured_content",
        skip_serializing_if = "Option::is_none"
    )]
    pub structured_content: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    #[serde(
        rename = "isError",
        alias = "is_error",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_error: Option<bool>,
}

impl ToolEnvelope {
    /// True when the remote tool signalled its error flag.
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Text of the first text chunk, if any. Used for error messages.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|chunk| match chunk {
            ContentChunk::Text { text: Some(text) } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// One typed chunk of tool output. Only `text` and `json` chunks are
/// meaningful; every other chunk type is carried through but ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentChunk {
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    Json {
        #[serde(skip_serializing_if = "Option::is_none")]
        json: Option<Value>,
    },
    #[serde(other)]
    Other,
}

impl ContentChunk {
    /// Build a text chunk.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: Some(text.into()),
        }
    }

    /// Build a json chunk.
    pub fn json(json: Value) -> Self {
        Self::Json { json: Some(json) }
    }
}

/// What the unwrapper recovered from an envelope.
#[derive(Debug, Clone, Default)]
pub struct UnwrappedResult {
    /// The parsed payload extracted from the content chunks (empty object
    /// when no content chunk yielded anything).
    pub parsed: Value,
    /// The located row payload, still un-normalized.
    pub raw_rows: Option<Value>,
    /// SQL echoed by the tool, from the parsed payload or the envelope.
    pub sql: Option<String>,
}
