// Project analysis tools: line counts, directory structure, dependencies

use crate::protocol::{CallToolResult, ToolSchema};
use crate::render;
use crate::tools::{
    json_schema_array, json_schema_boolean, json_schema_integer, json_schema_object,
    json_schema_string, Tool,
};
use crate::workspace::Workspace;
use anyhow::{Context, Result};
use atelier_core::analysis::{
    analyze_dependencies, analyze_structure, count_lines, DependencyOptions, LineCountOptions,
    StructureOptions,
};
use serde::Deserialize;
use std::path::PathBuf;

const MAX_STRUCTURE_DEPTH: i64 = 10;

/// Resolve the requested path or build the error result to hand back
fn resolve(workspace: &Workspace, requested: &str) -> Result<PathBuf, CallToolResult> {
    workspace
        .resolve(requested)
        .map_err(|e| CallToolResult::error(e.to_string()))
}

/// Run a blocking analyzer off the async reader loop
async fn run_blocking<T, F>(work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .context("Analysis task panicked")
}

/// Tool to count code, comment and blank lines under a directory
pub struct CountLinesTool {
    workspace: Workspace,
}

impl CountLinesTool {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[derive(Debug, Deserialize)]
struct CountLinesArgs {
    path: String,
    #[serde(default)]
    extensions: Option<Vec<String>>,
}

#[async_trait::async_trait]
impl Tool for CountLinesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "count_lines".to_string(),
            description: "Count code, comment and blank lines in a directory, broken down by file extension. Skips hidden directories and node_modules.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "path": json_schema_string("Directory to analyze (relative to the workspace root)"),
                    "extensions": json_schema_array(
                        json_schema_string("File extension without the dot"),
                        "Only count files with these extensions, e.g. [\"ts\", \"js\"]"
                    )
                }),
                vec!["path"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: CountLinesArgs =
            serde_json::from_value(arguments).context("Invalid arguments for count_lines")?;

        let root = match resolve(&self.workspace, &args.path) {
            Ok(root) => root,
            Err(result) => return Ok(result),
        };
        let options = LineCountOptions {
            extensions: args.extensions.unwrap_or_default(),
            budget: self.workspace.budget(),
        };

        tracing::info!(path = %root.display(), "Counting lines");
        let result = run_blocking(move || count_lines(&root, &options)).await?;

        Ok(if result.success {
            CallToolResult::text(render::line_count(&args.path, &result))
        } else {
            CallToolResult::error(render::line_count(&args.path, &result))
        })
    }
}

/// Tool to render a directory tree
pub struct AnalyzeStructureTool {
    workspace: Workspace,
}

impl AnalyzeStructureTool {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeStructureArgs {
    path: String,
    #[serde(default)]
    max_depth: Option<usize>,
    #[serde(default)]
    show_hidden: Option<bool>,
}

#[async_trait::async_trait]
impl Tool for AnalyzeStructureTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "analyze_structure".to_string(),
            description: "Show the directory tree of a path with file and directory counts".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "path": json_schema_string("Directory to analyze (relative to the workspace root)"),
                    "maxDepth": json_schema_integer(
                        "How many levels to list (default: unlimited)",
                        Some(1),
                        Some(MAX_STRUCTURE_DEPTH)
                    ),
                    "showHidden": json_schema_boolean("Include dot-prefixed entries (default: false)")
                }),
                vec!["path"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: AnalyzeStructureArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for analyze_structure")?;

        let root = match resolve(&self.workspace, &args.path) {
            Ok(root) => root,
            Err(result) => return Ok(result),
        };
        let options = StructureOptions {
            max_depth: args.max_depth,
            show_hidden: args.show_hidden.unwrap_or(false),
            budget: self.workspace.budget(),
        };

        tracing::info!(path = %root.display(), max_depth = ?options.max_depth, "Analyzing structure");
        let result = run_blocking(move || analyze_structure(&root, &options)).await?;

        Ok(if result.success {
            CallToolResult::text(render::structure(&result))
        } else {
            CallToolResult::error(render::structure(&result))
        })
    }
}

/// Tool to list package.json dependencies and scripts
pub struct AnalyzeDependenciesTool {
    workspace: Workspace,
}

impl AnalyzeDependenciesTool {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeDependenciesArgs {
    path: String,
    #[serde(default)]
    include_dev_deps: Option<bool>,
}

#[async_trait::async_trait]
impl Tool for AnalyzeDependenciesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "analyze_dependencies".to_string(),
            description: "List the dependencies, dev dependencies and scripts declared in a project's package.json".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "path": json_schema_string("Project directory containing package.json (relative to the workspace root)"),
                    "includeDevDeps": json_schema_boolean("Include devDependencies (default: true)")
                }),
                vec!["path"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: AnalyzeDependenciesArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for analyze_dependencies")?;

        let root = match resolve(&self.workspace, &args.path) {
            Ok(root) => root,
            Err(result) => return Ok(result),
        };
        let options = DependencyOptions {
            include_dev_deps: args.include_dev_deps.unwrap_or(true),
        };

        tracing::info!(path = %root.display(), "Analyzing dependencies");
        let result = run_blocking(move || analyze_dependencies(&root, &options)).await?;

        Ok(if result.success {
            CallToolResult::text(render::dependencies(&result))
        } else {
            CallToolResult::error(render::dependencies(&result))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workspace() -> (TempDir, Workspace) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("app/src")).unwrap();
        std::fs::write(root.join("app/src/index.ts"), "// c\n\nlet x = 1;\n").unwrap();
        std::fs::write(
            root.join("app/package.json"),
            r#"{"name":"app","dependencies":{"a":"1.0.0"},"devDependencies":{"b":"2.0.0"}}"#,
        )
        .unwrap();
        let workspace = Workspace::new(root.to_path_buf());
        (temp_dir, workspace)
    }

    #[tokio::test]
    async fn test_count_lines_tool() {
        let (_dir, workspace) = workspace();
        let tool = CountLinesTool::new(workspace);
        let result = tool
            .execute(serde_json::json!({ "path": "app", "extensions": ["ts"] }))
            .await
            .unwrap();

        assert!(!result.is_error());
        let text = result.text_content();
        assert!(text.contains("Total lines:   3"));
        assert!(text.contains(".ts: 1 files"));
    }

    #[tokio::test]
    async fn test_count_lines_missing_path() {
        let (_dir, workspace) = workspace();
        let tool = CountLinesTool::new(workspace);
        let result = tool
            .execute(serde_json::json!({ "path": "nowhere" }))
            .await
            .unwrap();
        assert!(result.is_error());
        assert!(result.text_content().contains("Path not found"));
    }

    #[tokio::test]
    async fn test_path_escape_rejected() {
        let (_dir, workspace) = workspace();
        let tool = AnalyzeStructureTool::new(workspace);
        let result = tool
            .execute(serde_json::json!({ "path": "../.." }))
            .await
            .unwrap();
        assert!(result.is_error());
        assert!(result.text_content().contains("Access denied"));
    }

    #[tokio::test]
    async fn test_analyze_structure_tool() {
        let (_dir, workspace) = workspace();
        let tool = AnalyzeStructureTool::new(workspace);
        let result = tool
            .execute(serde_json::json!({ "path": "app", "maxDepth": 1 }))
            .await
            .unwrap();

        let text = result.text_content();
        assert!(text.starts_with("app\n"));
        assert!(text.contains("├── src/"));
        assert!(text.contains("└── package.json"));
        assert!(!text.contains("index.ts"));
        assert!(text.contains("1 directories, 1 files"));
    }

    #[tokio::test]
    async fn test_analyze_dependencies_without_dev() {
        let (_dir, workspace) = workspace();
        let tool = AnalyzeDependenciesTool::new(workspace);
        let result = tool
            .execute(serde_json::json!({ "path": "app", "includeDevDeps": false }))
            .await
            .unwrap();

        let text = result.text_content();
        assert!(text.contains("a@1.0.0"));
        assert!(!text.contains("b@2.0.0"));
    }

    #[tokio::test]
    async fn test_analyze_dependencies_missing_manifest() {
        let (_dir, workspace) = workspace();
        let tool = AnalyzeDependenciesTool::new(workspace);
        let result = tool
            .execute(serde_json::json!({ "path": "app/src" }))
            .await
            .unwrap();
        assert!(result.is_error());
        assert!(result.text_content().contains("No package.json"));
    }
}
