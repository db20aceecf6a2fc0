//! The remote tool catalog capability.
//!
//! Everything above this trait depends only on two operations: list the
//! catalog, call a tool by name. Keeping the seam this narrow is what makes
//! the whole adaptation core testable without a server.

use crate::error::BridgeResult;
use crate::models::{JsonMap, ToolDescriptor, ToolEnvelope};
use async_trait::async_trait;
use std::sync::Arc;

/// Shared handle to a connected transport.
pub type TransportHandle = Arc<dyn ToolTransport>;

/// Capability exposed by a connected remote tool server.
#[async_trait]
pub trait ToolTransport: Send + Sync {
    /// List all tools the remote catalog currently declares.
    async fn list_tools(&self) -> BridgeResult<Vec<ToolDescriptor>>;

    /// Invoke a tool by name with the given argument mapping.
    async fn call_tool(&self, name: &str, arguments: JsonMap) -> BridgeResult<ToolEnvelope>;

    /// Name of this transport for logging.
    fn name(&self) -> &'static str;
}
