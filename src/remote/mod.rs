//! Remote tool server access.
//!
//! This module owns everything that talks to the remote MCP server:
//! - `transport`: the capability seam (`list_tools` / `call_tool`)
//! - `client`: the concrete rmcp streamable-HTTP client
//! - `session`: the process-wide, lazily-created, self-healing connection
//! - `invoker`: catalog lookup and tool invocation on top of a transport

pub mod client;
pub mod invoker;
pub mod session;
pub mod transport;

pub use client::RemoteMcpClient;
pub use invoker::{call_remote_tool, resolve_tool};
pub use session::{ConnectFactory, SessionCell};
pub use transport::{ToolTransport, TransportHandle};
