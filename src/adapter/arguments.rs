//! Schema-driven tool argument building.
//!
//! Remote tools have heterogeneous, server-defined input schemas; one
//! deployment calls its input property `query`, another `sql`, another
//! `prompt`. This builder lets a single semantic value (the prompt or SQL
//! text) satisfy whichever property name a given deployment uses, while
//! explicit structured overrides always take precedence.

use crate::error::{BridgeError, BridgeResult};
use crate::models::{JsonMap, ToolCallContext, ToolDescriptor};
use serde_json::Value;

/// What a declared property name means once normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SemanticRole {
    /// Natural-language intent or raw SQL text
    Prompt,
    /// The statement to execute; carries the same context value as `Prompt`
    Statement,
}

/// Alias table: normalized property name -> semantic role.
///
/// Extend here when a deployment spells its input property differently; call
/// sites never change.
const ALIASES: &[(&str, SemanticRole)] = &[
    ("prompt", SemanticRole::Prompt),
    ("question", SemanticRole::Prompt),
    ("input", SemanticRole::Prompt),
    ("query", SemanticRole::Statement),
    ("sql", SemanticRole::Statement),
];

/// Lowercase a property name and drop everything non-alphanumeric, so that
/// `SQL_Query`-style spellings still land on an alias.
fn normalize_property_name(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_lowercase()
}

/// Infer a value for a declared property from the call context, if its
/// normalized name matches a known alias.
fn infer_value(name: &str, context: &ToolCallContext) -> Option<Value> {
    let normalized = normalize_property_name(name);
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, role)| match role {
            SemanticRole::Prompt | SemanticRole::Statement => {
                Value::String(context.prompt.clone())
            }
        })
}

/// Build a concrete argument mapping for a tool's declared input schema.
///
/// Explicit overrides win over inference for matching declared names and are
/// consumed; leftovers merge into the result verbatim. Fails only when
/// declared-required properties remain unresolved, listing every missing
/// name.
pub fn build_arguments_for_tool(
    tool: &ToolDescriptor,
    context: &ToolCallContext,
    explicit: Option<&JsonMap>,
) -> BridgeResult<JsonMap> {
    let mut overrides = explicit.cloned().unwrap_or_default();

    let declared: Vec<String> = tool
        .input_schema
        .as_ref()
        .map(|s| s.properties.keys().cloned().collect())
        .unwrap_or_default();

    let mut arguments = JsonMap::new();

    if declared.is_empty() {
        arguments.insert("prompt".to_string(), Value::String(context.prompt.clone()));
        for (name, value) in overrides {
            arguments.insert(name, value);
        }
        return Ok(arguments);
    }

    for name in &declared {
        if let Some(value) = overrides.remove(name) {
            arguments.insert(name.clone(), value);
        } else if let Some(value) = infer_value(name, context) {
            arguments.insert(name.clone(), value);
        }
        // Unresolvable properties stay omitted; required ones fail below.
    }

    for (name, value) in overrides {
        arguments.insert(name, value);
    }

    let missing: Vec<String> = tool
        .required_names()
        .iter()
        .filter(|name| !arguments.contains_key(*name))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(BridgeError::missing_arguments(&tool.name, missing));
    }

    if arguments.is_empty() {
        if explicit.is_some() {
            return Ok(explicit.cloned().unwrap_or_default());
        }
        arguments.insert("prompt".to_string(), Value::String(context.prompt.clone()));
    }

    Ok(arguments)
}
