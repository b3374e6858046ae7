// Read-only resources: server metadata plus templated project views

use crate::protocol::{Resource, ResourceContents, ResourceTemplate, ServerInfo, ToolSchema, PROTOCOL_VERSION};
use crate::render;
use crate::workspace::Workspace;
use atelier_core::analysis::{
    analyze_dependencies, count_lines, dependencies::read_manifest, DependencyOptions,
    LineCountOptions, MANIFEST_FILE,
};
use moka::sync::Cache;
use std::time::Duration;

pub const SERVER_INFO_URI: &str = "atelier://server/info";
pub const SERVER_TOOLS_URI: &str = "atelier://server/tools";
const PROJECT_PREFIX: &str = "atelier://project/";
const FILE_PREFIX: &str = "file:///";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Denied(String),

    #[error("Failed to read resource: {0}")]
    Failed(String),
}

/// Parsed form of a resource URI
#[derive(Debug, Clone, PartialEq, Eq)]
enum ResourceUri<'a> {
    ServerInfo,
    ServerTools,
    Manifest(&'a str),
    Summary(&'a str),
    File(&'a str),
}

impl<'a> ResourceUri<'a> {
    fn parse(uri: &'a str) -> Option<Self> {
        match uri {
            SERVER_INFO_URI => return Some(Self::ServerInfo),
            SERVER_TOOLS_URI => return Some(Self::ServerTools),
            _ => {}
        }

        if let Some(rest) = uri.strip_prefix(PROJECT_PREFIX) {
            if let Some(path) = rest.strip_suffix("/manifest") {
                return Some(Self::Manifest(non_empty_path(path)));
            }
            if let Some(path) = rest.strip_suffix("/summary") {
                return Some(Self::Summary(non_empty_path(path)));
            }
            return None;
        }

        uri.strip_prefix(FILE_PREFIX)
            .filter(|path| !path.is_empty())
            .map(Self::File)
    }
}

fn non_empty_path(path: &str) -> &str {
    if path.is_empty() {
        "."
    } else {
        path
    }
}

/// Settings for resource reads
#[derive(Debug, Clone)]
pub struct ResourceSettings {
    pub cache_ttl: Duration,
    /// Maximum number of templated reads held in the cache
    pub cache_capacity: u64,
    pub max_file_bytes: u64,
}

impl Default for ResourceSettings {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(30),
            cache_capacity: 256,
            max_file_bytes: 1024 * 1024,
        }
    }
}

/// Serves static and templated resources
pub struct ResourceRegistry {
    workspace: Workspace,
    server_info: ServerInfo,
    tools: Vec<ToolSchema>,
    max_file_bytes: u64,
    cache: Cache<String, ResourceContents>,
}

impl ResourceRegistry {
    pub fn new(
        workspace: Workspace,
        server_info: ServerInfo,
        tools: Vec<ToolSchema>,
        settings: ResourceSettings,
    ) -> Self {
        Self {
            workspace,
            server_info,
            tools,
            max_file_bytes: settings.max_file_bytes,
            cache: Cache::builder()
                .max_capacity(settings.cache_capacity)
                .time_to_live(settings.cache_ttl)
                .build(),
        }
    }

    pub fn list(&self) -> Vec<Resource> {
        vec![
            Resource {
                uri: SERVER_INFO_URI.to_string(),
                name: "Server information".to_string(),
                description: Some("Name, version and capabilities of this server".to_string()),
                mime_type: Some("application/json".to_string()),
            },
            Resource {
                uri: SERVER_TOOLS_URI.to_string(),
                name: "Tool catalogue".to_string(),
                description: Some("Every tool this server exposes".to_string()),
                mime_type: Some("text/markdown".to_string()),
            },
        ]
    }

    pub fn templates(&self) -> Vec<ResourceTemplate> {
        vec![
            ResourceTemplate {
                uri_template: format!("{}{{path}}/manifest", PROJECT_PREFIX),
                name: "Project manifest".to_string(),
                description: Some(format!("Raw {} of a project directory", MANIFEST_FILE)),
                mime_type: Some("application/json".to_string()),
            },
            ResourceTemplate {
                uri_template: format!("{}{{path}}/summary", PROJECT_PREFIX),
                name: "Project summary".to_string(),
                description: Some("Line counts and dependencies of a project directory".to_string()),
                mime_type: Some("text/markdown".to_string()),
            },
            ResourceTemplate {
                uri_template: format!("{}{{path}}", FILE_PREFIX),
                name: "Workspace file".to_string(),
                description: Some("Text contents of a file inside the workspace".to_string()),
                mime_type: Some("text/plain".to_string()),
            },
        ]
    }

    /// Read a resource by URI. Templated resources go through the TTL cache.
    pub fn read(&self, uri: &str) -> Result<ResourceContents, ResourceError> {
        let parsed = ResourceUri::parse(uri).ok_or_else(|| ResourceError::NotFound(uri.to_string()))?;

        match parsed {
            ResourceUri::ServerInfo => Ok(self.server_info_contents()),
            ResourceUri::ServerTools => Ok(self.tool_catalogue()),
            templated => self
                .cache
                .try_get_with(uri.to_string(), || {
                    tracing::debug!(uri, "Resource cache miss");
                    self.read_templated(uri, templated)
                })
                .map_err(|e| (*e).clone()),
        }
    }

    fn read_templated(&self, uri: &str, parsed: ResourceUri<'_>) -> Result<ResourceContents, ResourceError> {
        match parsed {
            ResourceUri::Manifest(path) => self.manifest(uri, path),
            ResourceUri::Summary(path) => self.summary(uri, path),
            ResourceUri::File(path) => self.file(uri, path),
            ResourceUri::ServerInfo | ResourceUri::ServerTools => {
                Err(ResourceError::NotFound(uri.to_string()))
            }
        }
    }

    fn server_info_contents(&self) -> ResourceContents {
        let info = serde_json::json!({
            "name": self.server_info.name,
            "version": self.server_info.version,
            "protocolVersion": PROTOCOL_VERSION,
            "tools": self.tools.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            "workspace": self.workspace.root().display().to_string(),
        });
        ResourceContents {
            uri: SERVER_INFO_URI.to_string(),
            mime_type: Some("application/json".to_string()),
            text: serde_json::to_string_pretty(&info).unwrap_or_else(|_| info.to_string()),
        }
    }

    fn tool_catalogue(&self) -> ResourceContents {
        let mut text = String::from("# Tools\n\n");
        for tool in &self.tools {
            text.push_str(&format!("- **{}**: {}\n", tool.name, tool.description));
        }
        ResourceContents {
            uri: SERVER_TOOLS_URI.to_string(),
            mime_type: Some("text/markdown".to_string()),
            text,
        }
    }

    fn manifest(&self, uri: &str, path: &str) -> Result<ResourceContents, ResourceError> {
        let root = self
            .workspace
            .resolve(path)
            .map_err(|e| ResourceError::Denied(e.to_string()))?;
        let manifest = read_manifest(&root).map_err(|e| match e.kind() {
            atelier_core::ErrorKind::ManifestMissing => ResourceError::NotFound(uri.to_string()),
            _ => ResourceError::Failed(e.to_string()),
        })?;

        let text = serde_json::to_string_pretty(&manifest)
            .map_err(|e| ResourceError::Failed(e.to_string()))?;
        Ok(ResourceContents {
            uri: uri.to_string(),
            mime_type: Some("application/json".to_string()),
            text,
        })
    }

    fn summary(&self, uri: &str, path: &str) -> Result<ResourceContents, ResourceError> {
        let root = self
            .workspace
            .resolve(path)
            .map_err(|e| ResourceError::Denied(e.to_string()))?;
        if !root.exists() {
            return Err(ResourceError::NotFound(uri.to_string()));
        }

        let lines = count_lines(
            &root,
            &LineCountOptions {
                budget: self.workspace.budget(),
                ..Default::default()
            },
        );
        let deps = analyze_dependencies(&root, &DependencyOptions::default());

        let mut text = format!("# Project summary: {}\n\n## Lines\n\n", path);
        text.push_str(&render::line_count(path, &lines));
        text.push_str("\n## Dependencies\n\n");
        text.push_str(&render::dependencies(&deps));

        Ok(ResourceContents {
            uri: uri.to_string(),
            mime_type: Some("text/markdown".to_string()),
            text,
        })
    }

    fn file(&self, uri: &str, path: &str) -> Result<ResourceContents, ResourceError> {
        let resolved = self
            .workspace
            .resolve(path)
            .map_err(|e| ResourceError::Denied(e.to_string()))?;

        let metadata = match std::fs::metadata(&resolved) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ResourceError::NotFound(uri.to_string()));
            }
            Err(e) => return Err(ResourceError::Failed(e.to_string())),
        };
        if !metadata.is_file() {
            return Err(ResourceError::Failed(format!("{} is not a file", path)));
        }
        if metadata.len() > self.max_file_bytes {
            return Err(ResourceError::Failed(format!(
                "{} is {} bytes, larger than the {} byte limit",
                path,
                metadata.len(),
                self.max_file_bytes
            )));
        }

        let text = std::fs::read_to_string(&resolved).map_err(|e| match e.kind() {
            std::io::ErrorKind::InvalidData => ResourceError::Failed(format!("{} is not a text file", path)),
            _ => ResourceError::Failed(e.to_string()),
        })?;

        Ok(ResourceContents {
            uri: uri.to_string(),
            mime_type: Some("text/plain".to_string()),
            text,
        })
    }
}
