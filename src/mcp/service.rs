//! MCP service implementation using rmcp.
//!
//! This module defines the BridgeService struct with the two chat-facing
//! tools exposed via the MCP protocol using the rmcp framework's macros:
//! `supabase_schema` and `supabase_sql`.

use crate::bridge::SupabaseBridge;
use crate::render;
use rmcp::Json;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    schemars::JsonSchema,
    tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Output format for the supabase_sql tool.
#[derive(Debug, Clone, Copy, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Structured rows only (default)
    #[default]
    Json,
    /// Also include an aligned ASCII table rendering
    Table,
    /// Also include a markdown table rendering
    Markdown,
}

/// Input for the supabase_sql tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SqlToolInput {
    /// Read-only SQL statement (SELECT or WITH). Write operations are rejected.
    pub sql: String,
    /// Output format: "json" returns rows only, "table" and "markdown" add a rendered table
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output from the supabase_schema tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SchemaToolOutput {
    /// One line per table: `table(col:type, ...)`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Normalized introspection rows
    pub rows: Value,
}

/// Output from the supabase_sql tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SqlToolOutput {
    /// The statement that actually ran (echoed by the remote tool when available)
    pub sql: String,
    /// Normalized result rows: a sequence of objects, or any other JSON value
    pub rows: Value,
    /// Rendered table when a non-json format was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
}

#[derive(Clone)]
pub struct BridgeService {
    /// Shared facade over the remote Supabase MCP server
    bridge: Arc<SupabaseBridge>,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl BridgeService {
    /// Create a new BridgeService instance over a shared bridge facade.
    pub fn new(bridge: Arc<SupabaseBridge>) -> Self {
        Self {
            bridge,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl BridgeService {
    #[tool(
        description = "Fetch the public schema of the connected Supabase Postgres database.\nReturns a compact per-table summary (`table(col:type, ...)`) plus the raw introspection rows."
    )]
    async fn supabase_schema(&self) -> Result<Json<SchemaToolOutput>, McpError> {
        let snapshot = self.bridge.fetch_schema().await.map_err(McpError::from)?;
        Ok(Json(SchemaToolOutput {
            summary: snapshot.summary,
            rows: snapshot.rows,
        }))
    }

    #[tool(
        description = "Execute a read-only SQL statement against the connected Supabase Postgres database.\nOnly SELECT and WITH statements are accepted; a LIMIT 100 is applied when no LIMIT is present.\nReturns the executed SQL and the result rows."
    )]
    async fn supabase_sql(
        &self,
        Parameters(input): Parameters<SqlToolInput>,
    ) -> Result<Json<SqlToolOutput>, McpError> {
        let result = self
            .bridge
            .execute_sql(&input.sql)
            .await
            .map_err(McpError::from)?;

        let formatted = match input.format {
            OutputFormat::Json => None,
            OutputFormat::Table => Some(render::render_rows(&result.rows)),
            OutputFormat::Markdown => Some(
                render::extract_tabular_rows(&result.rows)
                    .map(|rows| render::format_as_markdown(&rows))
                    .unwrap_or_else(|| {
                        serde_json::to_string_pretty(&result.rows).unwrap_or_default()
                    }),
            ),
        };

        Ok(Json(SqlToolOutput {
            sql: result.sql,
            rows: result.rows,
            formatted,
        }))
    }
}

#[tool_handler]
impl ServerHandler for BridgeService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "supabase-mcp-bridge".to_owned(),
                title: Some("Supabase MCP Bridge".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Read-only tools for a Supabase Postgres database.\n\
                \n\
                ## Workflow\n\
                1. Call `supabase_schema` once to learn the tables and columns\n\
                2. Use `supabase_sql` with a SELECT statement referencing them\n\
                \n\
                ## Constraints\n\
                - Only SELECT and WITH statements are accepted\n\
                - Statements without a LIMIT get `LIMIT 100` appended\n\
                - Write keywords (INSERT, UPDATE, DELETE, DDL) are rejected\n\
                \n\
                ## Rows\n\
                `rows` is usually an array of objects; scalar or prose results\n\
                come back as a plain JSON value instead."
                    .to_string(),
            ),
        }
    }
}
