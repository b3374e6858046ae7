pub mod math;
pub mod project;
pub mod random;
pub mod text;
pub mod time;
mod registry;
mod validate;

pub use math::CalculateTool;
pub use project::{AnalyzeDependenciesTool, AnalyzeStructureTool, CountLinesTool};
pub use random::RandomNumberTool;
pub use registry::{
    json_schema_array, json_schema_boolean, json_schema_enum, json_schema_integer,
    json_schema_number, json_schema_object, json_schema_string, Tool, ToolRegistry,
};
pub use text::ReverseStringTool;
pub use time::CurrentTimeTool;
pub use validate::validate_arguments;

use crate::workspace::Workspace;
use std::sync::Arc;

/// Registry holding every built-in tool
pub fn default_registry(workspace: &Workspace) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    // Utility tools
    registry.register(Arc::new(CalculateTool));
    registry.register(Arc::new(CurrentTimeTool));
    registry.register(Arc::new(RandomNumberTool));
    registry.register(Arc::new(ReverseStringTool));

    // Project analysis tools
    registry.register(Arc::new(CountLinesTool::new(workspace.clone())));
    registry.register(Arc::new(AnalyzeStructureTool::new(workspace.clone())));
    registry.register(Arc::new(AnalyzeDependenciesTool::new(workspace.clone())));

    registry
}
