// MCP (Model Context Protocol) server exposing utility tools, project
// analyzers, read-only resources and prompt templates over stdio

pub mod config;
pub mod logging;
pub mod prompts;
pub mod protocol;
pub mod render;
pub mod resources;
pub mod server;
pub mod tools;
pub mod workspace;

pub use server::McpServer;
