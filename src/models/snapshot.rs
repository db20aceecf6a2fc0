//! Derived result models for the two facade operations.
//!
//! Both are recomputed per call and never persisted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of a schema fetch: a compact per-table summary plus the normalized
/// introspection rows and the raw envelope they came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub rows: Value,
    pub raw: Value,
}

/// Result of a SQL execution: the statement actually run (as echoed by the
/// tool, or the guarded input), the normalized rows, and the raw envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlExecutionResult {
    pub sql: String,
    pub rows: Value,
    pub raw: Value,
}
