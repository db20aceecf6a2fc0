//! Data models for the Supabase MCP bridge.
//!
//! This module re-exports all model types used throughout the application.

pub mod envelope;
pub mod snapshot;
pub mod tool;

// Re-export commonly used types
pub use envelope::{ContentChunk, ToolEnvelope, UnwrappedResult};
pub use snapshot::{SchemaSnapshot, SqlExecutionResult};
pub use tool::{ToolCallContext, ToolDescriptor, ToolInputSchema};

/// JSON object map used for tool arguments and row objects.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;
