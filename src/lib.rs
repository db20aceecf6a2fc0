//! Supabase MCP Bridge Library
//!
//! This library exposes read-only Supabase Postgres tools to chat assistants
//! over MCP. It connects to a remote Supabase MCP server as a client,
//! adapts that server's `execute_sql` tool (argument synthesis, payload
//! decoding, read-only guarding, result unwrapping), and serves the two
//! resulting operations (`supabase_schema`, `supabase_sql`) as MCP tools.

pub mod adapter;
pub mod bridge;
pub mod config;
pub mod error;
pub mod mcp;
pub mod models;
pub mod remote;
pub mod render;
pub mod transport;

pub use bridge::SupabaseBridge;
pub use config::Config;
pub use error::BridgeError;
pub use mcp::BridgeService;
