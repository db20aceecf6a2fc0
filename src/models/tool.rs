//! Remote tool catalog models.
//!
//! These types mirror what a remote MCP server declares for each tool, kept
//! deliberately lenient: different deployments disagree on field spelling and
//! on how much of the input schema they publish, and a missing piece must
//! never prevent the catalog from being read.

use crate::models::JsonMap;
use serde::{Deserialize, Serialize};

/// A tool declared by the remote catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "inputSchema",
        alias = "input_schema",
        skip_serializing_if = "Option::is_none"
    )]
    pub input_schema: Option<ToolInputSchema>,
}

impl ToolDescriptor {
    /// Create a descriptor with no declared input schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema: None,
        }
    }

    /// Attach an input schema.
    pub fn with_schema(mut self, schema: ToolInputSchema) -> Self {
        self.input_schema = Some(schema);
        self
    }

    /// Declared property names, empty when no schema is published.
    pub fn property_names(&self) -> Vec<&str> {
        self.input_schema
            .as_ref()
            .map(|s| s.properties.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Declared required property names, empty when no schema is published.
    pub fn required_names(&self) -> &[String] {
        self.input_schema
            .as_ref()
            .map(|s| s.required.as_slice())
            .unwrap_or_default()
    }
}

/// The subset of a JSON-Schema object declaration the bridge cares about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolInputSchema {
    #[serde(default)]
    pub properties: JsonMap,
    #[serde(default)]
    pub required: Vec<String>,
}

impl ToolInputSchema {
    /// Build a schema from property names with empty fragments, required as given.
    pub fn with_properties(names: &[&str], required: &[&str]) -> Self {
        let mut properties = JsonMap::new();
        for name in names {
            properties.insert((*name).to_string(), serde_json::json!({}));
        }
        Self {
            properties,
            required: required.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The single semantic value available for argument inference: the intended
/// prompt or raw SQL text. Always non-empty when used for SQL execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallContext {
    pub prompt: String,
}

impl ToolCallContext {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_deserializes_camel_case_schema() {
        let tool: ToolDescriptor = serde_json::from_str(
            r#"{"name": "execute_sql", "inputSchema": {"properties": {"query": {"type": "string"}}, "required": ["query"]}}"#,
        )
        .unwrap();
        assert_eq!(tool.name, "execute_sql");
        assert_eq!(tool.property_names(), vec!["query"]);
        assert_eq!(tool.required_names(), &["query".to_string()]);
    }

    #[test]
    fn test_descriptor_tolerates_missing_schema() {
        let tool: ToolDescriptor = serde_json::from_str(r#"{"name": "ping"}"#).unwrap();
        assert!(tool.input_schema.is_none());
        assert!(tool.property_names().is_empty());
        assert!(tool.required_names().is_empty());
    }

    #[test]
    fn test_descriptor_tolerates_unknown_fields() {
        let tool: ToolDescriptor = serde_json::from_str(
            r#"{"name": "execute_sql", "annotations": {"readOnlyHint": true}, "inputSchema": {"type": "object"}}"#,
        )
        .unwrap();
        assert!(tool.property_names().is_empty());
    }

    #[test]
    fn test_schema_builder() {
        let schema = ToolInputSchema::with_properties(&["sql", "schema"], &["sql"]);
        assert_eq!(schema.properties.len(), 2);
        assert_eq!(schema.required, vec!["sql".to_string()]);
    }
}
