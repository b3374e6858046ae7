// Standalone MCP server binary

use anyhow::{Context, Result};
use atelier_mcp::config::ServerConfig;
use atelier_mcp::logging::init_tracing;
use atelier_mcp::server::McpServer;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "atelier-mcp")]
#[command(about = "MCP server with utility tools and project analyzers", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "atelier.toml")]
    config: PathBuf,

    /// Workspace root that every path argument is confined to (default: current directory)
    #[arg(short, long, env = "ATELIER_ROOT")]
    root: Option<PathBuf>,

    /// Log filter, e.g. "info" or "atelier_mcp=debug" (overrides the config file)
    #[arg(long, env = "ATELIER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    let root = root
        .canonicalize()
        .with_context(|| format!("Workspace root {} is not accessible", root.display()))?;

    let mut config = ServerConfig::load(&args.config, root)?;
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if args.log_json {
        config.logging.json = true;
    }

    // Resolved once; nothing reads the log level after this point
    init_tracing(&config.logging);

    tracing::info!("Atelier MCP server starting...");
    tracing::info!("Workspace root: {}", config.root.display());

    let server = McpServer::from_config(&config);
    tracing::info!("Registered {} tools", server.tools().len());

    server.start().await?;

    Ok(())
}
