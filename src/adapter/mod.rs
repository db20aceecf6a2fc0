//! The tool-call adaptation core.
//!
//! Pure, synchronous components that sit between the remote tool catalog and
//! the SQL use case:
//! - `decode`: recover JSON values from text-encoded, double-escaped, or
//!   boundary-delimited payloads
//! - `guard`: validate and normalize free-text SQL into a bounded read-only
//!   statement
//! - `arguments`: synthesize a valid argument mapping for an arbitrary
//!   declared input schema
//! - `unwrap`: extract rows and echoed SQL from a heterogeneous response
//!   envelope
//! - `summary`: turn raw introspection rows into a compact per-table listing

pub mod arguments;
pub mod decode;
pub mod guard;
pub mod summary;
pub mod unwrap;

pub use arguments::build_arguments_for_tool;
pub use decode::{decode_escaped_json, normalize_rows_payload, strip_boundary_artifacts};
pub use guard::sanitize_read_only_sql;
pub use summary::summarize_schema_rows;
pub use unwrap::unwrap_tool_result;
