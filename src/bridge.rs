//! The Supabase bridge facade.
//!
//! Composes the guard, invoker, unwrapper, decoder, and summarizer into the
//! two operations the chat side consumes: fetch-schema and execute-sql. Both
//! run against the shared remote session; connection-class failures
//! invalidate that session so the next call reconnects.

use crate::adapter::{
    normalize_rows_payload, sanitize_read_only_sql, summarize_schema_rows, unwrap_tool_result,
};
use crate::config::ServerEndpoint;
use crate::error::BridgeResult;
use crate::models::{JsonMap, SchemaSnapshot, SqlExecutionResult, ToolCallContext, ToolEnvelope};
use crate::remote::{RemoteMcpClient, SessionCell, TransportHandle, call_remote_tool};
use serde_json::Value;
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

/// Name of the remote tool every query runs through.
pub const EXECUTE_SQL_TOOL: &str = "execute_sql";

/// Fixed introspection statement used to enumerate table/column/type
/// metadata. Capped well above any realistic public schema.
const SCHEMA_INTROSPECTION_SQL: &str = "select table_name, column_name, data_type \
     from information_schema.columns \
     where table_schema = 'public' \
     order by table_name, ordinal_position \
     limit 400";

/// Facade over the remote Supabase MCP server.
pub struct SupabaseBridge {
    session: Arc<SessionCell>,
}

impl SupabaseBridge {
    /// Create a bridge over an existing session cell.
    pub fn new(session: Arc<SessionCell>) -> Self {
        Self { session }
    }

    /// Create a bridge whose session lazily connects to `endpoint` on first
    /// use and invalidates itself when the client session ends.
    pub fn connect_to(endpoint: ServerEndpoint) -> Arc<Self> {
        let session = Arc::new_cyclic(|weak: &Weak<SessionCell>| {
            let weak = weak.clone();
            SessionCell::new(Box::new(move || {
                let endpoint = endpoint.clone();
                let weak = weak.clone();
                Box::pin(async move {
                    let client = RemoteMcpClient::connect(&endpoint).await?;
                    client.invalidate_on_close(weak);
                    Ok(Arc::new(client) as TransportHandle)
                })
            }))
        });
        Arc::new(Self::new(session))
    }

    /// Fetch the database schema and summarize it per table.
    pub async fn fetch_schema(&self) -> BridgeResult<SchemaSnapshot> {
        let transport = self.session.acquire().await?;
        let context = ToolCallContext::new(SCHEMA_INTROSPECTION_SQL);
        let envelope = self.invoke(transport, &context, None).await?;

        let unwrapped = unwrap_tool_result(&envelope);
        let rows = normalize_rows_payload(unwrapped.raw_rows.unwrap_or(Value::Null));
        let summary = summarize_schema_rows(&rows);
        debug!(
            tables = summary.as_deref().map(|s| s.lines().count()).unwrap_or(0),
            "Fetched schema snapshot"
        );

        Ok(SchemaSnapshot {
            summary,
            rows,
            raw: raw_value(&envelope),
        })
    }

    /// Guard and execute a SQL statement, returning normalized rows.
    pub async fn execute_sql(&self, sql: &str) -> BridgeResult<SqlExecutionResult> {
        let guarded = sanitize_read_only_sql(sql)?;
        let transport = self.session.acquire().await?;
        let context = ToolCallContext::new(guarded.clone());
        let envelope = self.invoke(transport, &context, None).await?;

        let unwrapped = unwrap_tool_result(&envelope);
        let rows = normalize_rows_payload(unwrapped.raw_rows.unwrap_or(Value::Null));
        let sql = unwrapped.sql.unwrap_or(guarded);

        Ok(SqlExecutionResult {
            sql,
            rows,
            raw: raw_value(&envelope),
        })
    }

    /// Invoke the execute_sql tool, dropping the shared session on
    /// connection-class failures so the next call reconnects.
    async fn invoke(
        &self,
        transport: TransportHandle,
        context: &ToolCallContext,
        explicit: Option<&JsonMap>,
    ) -> BridgeResult<ToolEnvelope> {
        match call_remote_tool(transport.as_ref(), EXECUTE_SQL_TOOL, context, explicit).await {
            Err(error) if error.is_connection() => {
                warn!(error = %error, "Remote call failed; invalidating session");
                self.session.invalidate();
                Err(error)
            }
            other => other,
        }
    }
}

fn raw_value(envelope: &ToolEnvelope) -> Value {
    serde_json::to_value(envelope).unwrap_or_default()
}
