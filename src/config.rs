//! Configuration handling for the Supabase MCP bridge.
//!
//! Two layers of configuration exist: CLI arguments / environment variables
//! for the bridge process itself (transport, bind address, logging), and a
//! JSON servers document describing the remote MCP servers the bridge can
//! connect to. Header and URL values in the servers document may embed
//! `${VAR}` placeholders resolved from the process environment.

use crate::error::{BridgeError, BridgeResult};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use url::Url;

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/";
pub const DEFAULT_SERVERS_FILE: &str = "mcp-servers.json";
pub const DEFAULT_SERVER_NAME: &str = "supabase";

/// Transport mode for the bridge's own MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// HTTP with Server-Sent Events (for web clients)
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Configuration for the Supabase MCP bridge.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "supabase-mcp-bridge",
    about = "MCP bridge exposing Supabase Postgres schema and query tools to chat assistants",
    version,
    author
)]
pub struct Config {
    /// Path to the JSON document describing remote MCP servers
    #[arg(
        short = 'f',
        long = "servers-file",
        value_name = "PATH",
        default_value = DEFAULT_SERVERS_FILE,
        env = "BRIDGE_SERVERS_FILE"
    )]
    pub servers_file: String,

    /// Name of the server entry to connect to
    #[arg(
        short = 's',
        long = "server",
        value_name = "NAME",
        default_value = DEFAULT_SERVER_NAME,
        env = "BRIDGE_SERVER_NAME"
    )]
    pub server_name: String,

    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "BRIDGE_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_HTTP_HOST,
        env = "BRIDGE_HTTP_HOST"
    )]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        env = "BRIDGE_HTTP_PORT"
    )]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_MCP_ENDPOINT,
        env = "BRIDGE_ENDPOINT"
    )]
    pub mcp_endpoint: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "BRIDGE_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "BRIDGE_JSON_LOGS")]
    pub json_logs: bool,

    /// Enable logging output (disabled by default to avoid interfering with stdio transport)
    #[arg(long, env = "BRIDGE_ENABLE_LOGS")]
    pub enable_logs: bool,
}

impl Config {
    /// Parse configuration from command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            servers_file: DEFAULT_SERVERS_FILE.to_string(),
            server_name: DEFAULT_SERVER_NAME.to_string(),
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            enable_logs: false,
        }
    }

    /// Get the HTTP bind address.
    pub fn http_bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    /// Load and resolve the configured server endpoint from the servers file.
    pub fn load_endpoint(&self) -> BridgeResult<ServerEndpoint> {
        let document = ServersDocument::load(Path::new(&self.servers_file))?;
        document.resolve(&self.server_name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

/// A resolved remote server endpoint: URL plus outgoing headers, with all
/// environment placeholders already substituted.
#[derive(Debug, Clone)]
pub struct ServerEndpoint {
    pub url: String,
    pub headers: HashMap<String, String>,
}

/// Raw per-server entry as it appears in the servers document.
#[derive(Debug, Clone, Deserialize)]
struct ServerEntry {
    url: Option<String>,
    #[serde(default)]
    headers: HashMap<String, String>,
}

/// The JSON servers document: `{"mcpServers": {"<name>": {"url": ..., "headers": {...}}}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServersDocument {
    #[serde(rename = "mcpServers", alias = "mcp_servers")]
    servers: HashMap<String, ServerEntry>,
}

impl ServersDocument {
    /// Load the servers document from a JSON file.
    pub fn load(path: &Path) -> BridgeResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::configuration(format!(
                "Failed to read servers file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&raw)
    }

    /// Parse the servers document from a JSON string.
    pub fn parse(raw: &str) -> BridgeResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| BridgeError::configuration(format!("Invalid servers file: {}", e)))
    }

    /// Names of all configured servers.
    pub fn server_names(&self) -> Vec<&str> {
        self.servers.keys().map(|s| s.as_str()).collect()
    }

    /// Resolve a named server entry into an endpoint, substituting `${VAR}`
    /// placeholders in the URL and every header value. Fails fast when the
    /// entry, its URL, or a referenced environment variable is absent.
    pub fn resolve(&self, name: &str) -> BridgeResult<ServerEndpoint> {
        let entry = self.servers.get(name).ok_or_else(|| {
            BridgeError::configuration(format!("No server entry named '{}' in servers file", name))
        })?;

        let url_template = entry.url.as_deref().ok_or_else(|| {
            BridgeError::configuration(format!("Server entry '{}' has no URL", name))
        })?;
        let url = expand_env_placeholders(url_template)?;

        Url::parse(&url).map_err(|e| {
            BridgeError::configuration(format!("Server entry '{}' has an invalid URL: {}", name, e))
        })?;

        let mut headers = HashMap::new();
        for (key, value) in &entry.headers {
            headers.insert(key.clone(), expand_env_placeholders(value)?);
        }

        Ok(ServerEndpoint { url, headers })
    }
}

/// Substitute `${VAR}` placeholders from the process environment.
///
/// A placeholder referencing an unset variable is a configuration error, not
/// an empty string: a half-built Authorization header would fail much later
/// with a far worse message.
pub fn expand_env_placeholders(template: &str) -> BridgeResult<String> {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| {
            BridgeError::configuration(format!(
                "Unterminated environment placeholder in '{}'",
                template
            ))
        })?;
        let var = &after[..end];
        let value = std::env::var(var).map_err(|_| {
            BridgeError::configuration(format!("Environment variable '{}' is not set", var))
        })?;
        result.push_str(&value);
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.transport, TransportMode::Stdio);
        assert_eq!(config.server_name, DEFAULT_SERVER_NAME);
        assert_eq!(config.http_host, DEFAULT_HTTP_HOST);
        assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
    }

    #[test]
    fn test_http_bind_addr() {
        let config = Config {
            http_host: "0.0.0.0".to_string(),
            http_port: 3000,
            ..Config::default()
        };
        assert_eq!(config.http_bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_expand_no_placeholders() {
        assert_eq!(
            expand_env_placeholders("https://example.com/mcp").unwrap(),
            "https://example.com/mcp"
        );
    }

    #[test]
    fn test_expand_single_placeholder() {
        unsafe { std::env::set_var("BRIDGE_TEST_TOKEN", "sbp_123") };
        assert_eq!(
            expand_env_placeholders("Bearer ${BRIDGE_TEST_TOKEN}").unwrap(),
            "Bearer sbp_123"
        );
    }

    #[test]
    fn test_expand_multiple_placeholders() {
        unsafe {
            std::env::set_var("BRIDGE_TEST_HOST", "db.example.com");
            std::env::set_var("BRIDGE_TEST_REF", "abcd1234");
        };
        assert_eq!(
            expand_env_placeholders("https://${BRIDGE_TEST_HOST}/v1/${BRIDGE_TEST_REF}").unwrap(),
            "https://db.example.com/v1/abcd1234"
        );
    }

    #[test]
    fn test_expand_missing_variable_fails() {
        let err = expand_env_placeholders("${BRIDGE_TEST_DEFINITELY_UNSET}").unwrap_err();
        assert!(matches!(err, BridgeError::Configuration { .. }));
        assert!(err.to_string().contains("BRIDGE_TEST_DEFINITELY_UNSET"));
    }

    #[test]
    fn test_expand_unterminated_placeholder_fails() {
        let err = expand_env_placeholders("Bearer ${TOKEN").unwrap_err();
        assert!(matches!(err, BridgeError::Configuration { .. }));
    }

    #[test]
    fn test_parse_servers_document() {
        let doc = ServersDocument::parse(
            r#"{"mcpServers": {"supabase": {"url": "https://example.com/mcp", "headers": {"Authorization": "Bearer token"}}}}"#,
        )
        .unwrap();
        let endpoint = doc.resolve("supabase").unwrap();
        assert_eq!(endpoint.url, "https://example.com/mcp");
        assert_eq!(
            endpoint.headers.get("Authorization").map(String::as_str),
            Some("Bearer token")
        );
    }

    #[test]
    fn test_resolve_with_placeholder_in_header() {
        unsafe { std::env::set_var("BRIDGE_TEST_PAT", "sbp_secret") };
        let doc = ServersDocument::parse(
            r#"{"mcpServers": {"supabase": {"url": "https://example.com/mcp", "headers": {"Authorization": "Bearer ${BRIDGE_TEST_PAT}"}}}}"#,
        )
        .unwrap();
        let endpoint = doc.resolve("supabase").unwrap();
        assert_eq!(
            endpoint.headers.get("Authorization").map(String::as_str),
            Some("Bearer sbp_secret")
        );
    }

    #[test]
    fn test_resolve_missing_server_entry() {
        let doc = ServersDocument::parse(r#"{"mcpServers": {}}"#).unwrap();
        let err = doc.resolve("supabase").unwrap_err();
        assert!(matches!(err, BridgeError::Configuration { .. }));
        assert!(err.to_string().contains("supabase"));
    }

    #[test]
    fn test_resolve_missing_url() {
        let doc =
            ServersDocument::parse(r#"{"mcpServers": {"supabase": {"headers": {}}}}"#).unwrap();
        let err = doc.resolve("supabase").unwrap_err();
        assert!(err.to_string().contains("no URL"));
    }

    #[test]
    fn test_resolve_invalid_url() {
        let doc = ServersDocument::parse(r#"{"mcpServers": {"supabase": {"url": "not a url"}}}"#)
            .unwrap();
        let err = doc.resolve("supabase").unwrap_err();
        assert!(matches!(err, BridgeError::Configuration { .. }));
    }

    #[test]
    fn test_invalid_document_fails() {
        let err = ServersDocument::parse("not json").unwrap_err();
        assert!(matches!(err, BridgeError::Configuration { .. }));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = ServersDocument::load(Path::new("/nonexistent/servers.json")).unwrap_err();
        assert!(matches!(err, BridgeError::Configuration { .. }));
    }
}
