//! rmcp-backed remote tool client.
//!
//! Connects to the configured remote MCP server over streamable HTTP, with
//! the configured headers on every request. Catalog and result types cross
//! the wire through a serde round-trip into the local lenient models, so a
//! server-side field the SDK does not model never breaks the bridge.

use crate::config::ServerEndpoint;
use crate::error::{BridgeError, BridgeResult};
use crate::models::{JsonMap, ToolDescriptor, ToolEnvelope};
use crate::remote::session::SessionCell;
use crate::remote::transport::ToolTransport;
use async_trait::async_trait;
use rmcp::ServiceExt;
use rmcp::model::CallToolRequestParam;
use rmcp::service::{RoleClient, RunningService, ServiceError};
use rmcp::transport::StreamableHttpClientTransport;
use rmcp::transport::streamable_http_client::StreamableHttpClientTransportConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Weak;
use tracing::{info, warn};

/// A connected rmcp client session against the remote tool server.
pub struct RemoteMcpClient {
    service: RunningService<RoleClient, ()>,
}

impl RemoteMcpClient {
    /// Open a streamable-HTTP session against the endpoint.
    pub async fn connect(endpoint: &ServerEndpoint) -> BridgeResult<Self> {
        let headers = build_header_map(endpoint)?;
        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| {
                BridgeError::connection(
                    format!("Failed to build HTTP client: {}", e),
                    "Check the configured headers",
                )
            })?;

        let transport = StreamableHttpClientTransport::with_client(
            http_client,
            StreamableHttpClientTransportConfig::with_uri(endpoint.url.clone()),
        );

        let service = ().serve(transport).await.map_err(|e| {
            BridgeError::connection(
                format!("Failed to connect to MCP server: {}", e),
                "Check the server URL and credentials",
            )
        })?;

        info!(url = %endpoint.url, "Connected to remote MCP server");
        Ok(Self { service })
    }

    /// Invalidate the owning session cell when this client's session ends,
    /// so the next caller reconnects instead of hitting a dead handle.
    pub fn invalidate_on_close(&self, cell: Weak<SessionCell>) {
        let token = self.service.cancellation_token();
        tokio::spawn(async move {
            token.cancelled().await;
            if let Some(cell) = cell.upgrade() {
                warn!("Remote MCP session closed; dropping shared connection");
                cell.invalidate();
            }
        });
    }
}

#[async_trait]
impl ToolTransport for RemoteMcpClient {
    async fn list_tools(&self) -> BridgeResult<Vec<ToolDescriptor>> {
        let tools = self
            .service
            .list_all_tools()
            .await
            .map_err(|e| map_service_error("tools/list", e))?;

        tools
            .into_iter()
            .map(|tool| {
                let value = serde_json::to_value(&tool).map_err(|e| {
                    BridgeError::internal(format!("Unserializable tool declaration: {}", e))
                })?;
                serde_json::from_value(value).map_err(|e| {
                    BridgeError::internal(format!("Unreadable tool declaration: {}", e))
                })
            })
            .collect()
    }

    async fn call_tool(&self, name: &str, arguments: JsonMap) -> BridgeResult<ToolEnvelope> {
        let result = self
            .service
            .call_tool(CallToolRequestParam {
                name: name.to_string().into(),
                arguments: Some(arguments),
            })
            .await
            .map_err(|e| map_service_error(name, e))?;

        let value = serde_json::to_value(&result)
            .map_err(|e| BridgeError::internal(format!("Unserializable tool result: {}", e)))?;
        serde_json::from_value(value)
            .map_err(|e| BridgeError::internal(format!("Unreadable tool result: {}", e)))
    }

    fn name(&self) -> &'static str {
        "streamable-http"
    }
}

/// Build the outgoing header map from the endpoint configuration.
fn build_header_map(endpoint: &ServerEndpoint) -> BridgeResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (key, value) in &endpoint.headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
            BridgeError::configuration(format!("Invalid header name '{}'", key))
        })?;
        let value = HeaderValue::from_str(value).map_err(|_| {
            BridgeError::configuration(format!("Invalid value for header '{}'", key))
        })?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Map an rmcp service error onto the bridge taxonomy.
///
/// A protocol-level error response means the session is still alive, so it
/// becomes `RemoteTool`; everything else (transport failures, cancellation,
/// timeouts) is a connection-class failure that warrants reconnecting.
fn map_service_error(operation: &str, error: ServiceError) -> BridgeError {
    match error {
        ServiceError::McpError(data) => BridgeError::remote_tool(operation, data.message),
        other => BridgeError::connection(
            format!("MCP transport failure during {}: {}", operation, other),
            "The connection will be reopened on the next call",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_build_header_map() {
        let endpoint = ServerEndpoint {
            url: "https://example.com/mcp".to_string(),
            headers: HashMap::from([(
                "Authorization".to_string(),
                "Bearer token".to_string(),
            )]),
        };
        let headers = build_header_map(&endpoint).unwrap();
        assert_eq!(headers.get("authorization").unwrap(), "Bearer token");
    }

    #[test]
    fn test_build_header_map_rejects_bad_name() {
        let endpoint = ServerEndpoint {
            url: "https://example.com/mcp".to_string(),
            headers: HashMap::from([("bad header".to_string(), "x".to_string())]),
        };
        let err = build_header_map(&endpoint).unwrap_err();
        assert!(matches!(err, BridgeError::Configuration { .. }));
    }
}
