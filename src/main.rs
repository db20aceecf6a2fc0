//! Supabase MCP Bridge - Main entry point.
//!
//! Connects to a configured remote Supabase MCP server and exposes
//! read-only schema and query tools to chat assistants over MCP.

use clap::Parser;
use supabase_mcp_bridge::bridge::SupabaseBridge;
use supabase_mcp_bridge::config::{Config, TransportMode};
use supabase_mcp_bridge::transport::{HttpTransport, StdioTransport, Transport};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse();

    // Logging goes to stderr; still off by default so stdio integrations
    // stay quiet unless asked
    if config.enable_logs || config.transport == TransportMode::Http {
        init_tracing(&config);
    }

    info!(
        transport = %config.transport,
        server = %config.server_name,
        "Starting Supabase MCP Bridge v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Resolve the remote server endpoint up front so configuration problems
    // fail fast, before any client connects
    let endpoint = match config.load_endpoint() {
        Ok(endpoint) => endpoint,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            eprintln!("The servers file must look like:");
            eprintln!("  {{");
            eprintln!("    \"mcpServers\": {{");
            eprintln!("      \"supabase\": {{");
            eprintln!("        \"url\": \"https://mcp.supabase.com/mcp?project_ref=...\",");
            eprintln!("        \"headers\": {{");
            eprintln!("          \"Authorization\": \"Bearer ${{SUPABASE_ACCESS_TOKEN}}\"");
            eprintln!("        }}");
            eprintln!("      }}");
            eprintln!("    }}");
            eprintln!("  }}");
            std::process::exit(1);
        }
    };

    // The remote connection is created lazily on the first tool call and
    // shared by all callers afterwards
    let bridge = SupabaseBridge::connect_to(endpoint);

    let result = match config.transport {
        TransportMode::Stdio => {
            info!("Using stdio transport");
            let transport = StdioTransport::new(bridge);
            transport.run().await
        }
        TransportMode::Http => {
            info!(
                host = %config.http_host,
                port = config.http_port,
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let transport = HttpTransport::new(
                bridge,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
