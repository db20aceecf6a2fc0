//! Error types for the Supabase MCP bridge.
//!
//! This module defines all error types using `thiserror` for ergonomic error
//! handling. Each variant corresponds to one failure class of the bridge:
//! configuration problems, rejected SQL, unresolvable tool arguments, catalog
//! lookup failures, remote tool failures, and connection failures.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum BridgeError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid SQL statement: {message}")]
    Validation { message: String },

    #[error("Required arguments missing for tool '{tool}': {}", missing.join(", "))]
    MissingArguments { tool: String, missing: Vec<String> },

    #[error("Remote catalog returned no tools")]
    NoTools,

    #[error("Tool '{name}' not found in remote catalog")]
    ToolNotFound { name: String },

    #[error("Remote tool '{tool}' failed: {message}")]
    RemoteTool { tool: String, message: String },

    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BridgeError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a validation error for a rejected SQL statement.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a missing-arguments error listing every unresolved name.
    pub fn missing_arguments(tool: impl Into<String>, missing: Vec<String>) -> Self {
        Self::MissingArguments {
            tool: tool.into(),
            missing,
        }
    }

    /// Create a tool-not-found error.
    pub fn tool_not_found(name: impl Into<String>) -> Self {
        Self::ToolNotFound { name: name.into() }
    }

    /// Create a remote-tool error (the envelope's error flag was set).
    pub fn remote_tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RemoteTool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }

    /// True when the shared session should be invalidated and rebuilt.
    ///
    /// A remote tool signalling its error flag does not mean the connection
    /// itself is broken, so only transport-level failures count.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

/// Result type alias for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Build suggestion data as JSON value.
fn suggestion_data(suggestion: Option<&str>) -> Option<serde_json::Value> {
    suggestion.map(|s| serde_json::json!({ "suggestion": s }))
}

/// Convert BridgeError to MCP ErrorData for semantic error categorization.
impl From<BridgeError> for rmcp::ErrorData {
    fn from(err: BridgeError) -> Self {
        match &err {
            // Caller-fixable input problems -> invalid_params
            BridgeError::Validation { .. } => {
                rmcp::ErrorData::invalid_params(err.to_string(), None)
            }
            BridgeError::MissingArguments { missing, .. } => rmcp::ErrorData::invalid_params(
                err.to_string(),
                Some(serde_json::json!({ "missing": missing })),
            ),

            // Catalog lookups -> resource_not_found
            BridgeError::NoTools => rmcp::ErrorData::resource_not_found(err.to_string(), None),
            BridgeError::ToolNotFound { .. } => {
                rmcp::ErrorData::resource_not_found(err.to_string(), None)
            }

            // Everything operator-side or remote-side -> internal_error
            BridgeError::Configuration { .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), None)
            }
            BridgeError::RemoteTool { .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), None)
            }
            BridgeError::Connection { suggestion, .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), suggestion_data(Some(suggestion)))
            }
            BridgeError::Internal { .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), suggestion_data(err.suggestion()))
            }
        }
    }
}
