// Core analyzers and shared types for the Atelier MCP server

pub mod analysis;
pub mod error;
pub mod paths;
pub mod types;

pub use error::{AnalysisError, ErrorKind};
pub use types::*;
