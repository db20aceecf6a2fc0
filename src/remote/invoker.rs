//! Tool resolution and invocation.
//!
//! Looks a tool up in the remote catalog, synthesizes its arguments from the
//! call context, invokes it, and surfaces protocol-level errors. The catalog
//! is re-listed on every call cycle; only the connection itself is cached.

use crate::adapter::build_arguments_for_tool;
use crate::error::{BridgeError, BridgeResult};
use crate::models::{JsonMap, ToolCallContext, ToolDescriptor, ToolEnvelope};
use crate::remote::transport::ToolTransport;
use tracing::debug;

/// Resolve a tool by name from the remote catalog.
///
/// Fails with `NoTools` when the catalog is empty and `ToolNotFound` when no
/// entry matches.
pub async fn resolve_tool(
    transport: &dyn ToolTransport,
    name: &str,
) -> BridgeResult<ToolDescriptor> {
    let tools = transport.list_tools().await?;
    if tools.is_empty() {
        return Err(BridgeError::NoTools);
    }
    tools
        .into_iter()
        .find(|tool| tool.name == name)
        .ok_or_else(|| BridgeError::tool_not_found(name))
}

/// Resolve, build arguments, and invoke a remote tool.
///
/// Fails with `RemoteTool` when the response envelope's error flag is set,
/// carrying the first text chunk as the message when one exists.
pub async fn call_remote_tool(
    transport: &dyn ToolTransport,
    name: &str,
    context: &ToolCallContext,
    explicit: Option<&JsonMap>,
) -> BridgeResult<ToolEnvelope> {
    let tool = resolve_tool(transport, name).await?;
    let arguments = build_arguments_for_tool(&tool, context, explicit)?;

    debug!(
        tool = %name,
        arguments = %serde_json::Value::Object(arguments.clone()),
        "Calling remote tool"
    );

    let envelope = transport.call_tool(name, arguments).await?;
    if envelope.is_error() {
        let message = envelope
            .first_text()
            .unwrap_or("remote tool reported an error")
            .to_string();
        return Err(BridgeError::remote_tool(name, message));
    }

    Ok(envelope)
}
