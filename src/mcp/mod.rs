//! MCP server integration module.
//!
//! This module exposes the bridge's two operations as MCP tools using the
//! rmcp framework, so an external chat/completion engine can register them
//! as callable tools.

pub mod service;

pub use service::BridgeService;
