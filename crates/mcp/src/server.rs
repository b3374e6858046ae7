// MCP server: request dispatch and the stdio transport loop

use crate::config::ServerConfig;
use crate::prompts::{PromptError, PromptRegistry};
use crate::protocol::*;
use crate::resources::{ResourceError, ResourceRegistry, ResourceSettings};
use crate::tools::{default_registry, ToolRegistry};
use crate::workspace::Workspace;
use anyhow::{Context, Result};
use atelier_core::analysis::WalkBudget;
use futures::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};

pub struct McpServer {
    info: ServerInfo,
    tools: ToolRegistry,
    resources: Arc<ResourceRegistry>,
    prompts: PromptRegistry,
}

impl McpServer {
    pub fn new(
        info: ServerInfo,
        tools: ToolRegistry,
        resources: ResourceRegistry,
        prompts: PromptRegistry,
    ) -> Self {
        Self {
            info,
            tools,
            resources: Arc::new(resources),
            prompts,
        }
    }

    /// Build a server with every built-in tool, resource and prompt
    pub fn from_config(config: &ServerConfig) -> Self {
        let workspace = Workspace::new(config.root.clone())
            .with_budget(WalkBudget::new(config.analysis.max_entries));
        let info = ServerInfo {
            name: config.server.name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        };

        let tools = default_registry(&workspace);
        let resources = ResourceRegistry::new(
            workspace.clone(),
            info.clone(),
            tools.list_schemas(),
            ResourceSettings {
                cache_ttl: config.cache_ttl(),
                cache_capacity: config.resources.cache_capacity,
                max_file_bytes: config.resources.max_file_bytes,
            },
        );
        let prompts = PromptRegistry::new(workspace);

        Self::new(info, tools, resources, prompts)
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Serve newline-delimited JSON-RPC on stdin/stdout until stdin closes
    pub async fn start(&self) -> Result<()> {
        tracing::info!(
            name = %self.info.name,
            version = %self.info.version,
            tools = self.tools.len(),
            "MCP server listening on stdio"
        );
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve over any reader/writer pair
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = FramedRead::new(reader, LinesCodec::new());
        let mut sink = FramedWrite::new(writer, LinesCodec::new());

        while let Some(line) = lines.next().await {
            let line = line.context("Failed to read from transport")?;
            if let Some(response) = self.handle_line(&line).await {
                sink.send(response)
                    .await
                    .context("Failed to write response")?;
            }
        }

        tracing::info!("Transport closed, shutting down");
        Ok(())
    }

    /// Handle one raw line. Returns the serialized response, if any.
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let response = match serde_json::from_str::<serde_json::Value>(line) {
            Err(e) => {
                tracing::warn!(error = %e, "Received malformed JSON");
                Some(JsonRpcResponse::error(
                    serde_json::Value::Null,
                    JsonRpcError::parse_error(e),
                ))
            }
            Ok(value) => {
                let id = value.get("id").cloned().unwrap_or(serde_json::Value::Null);
                match serde_json::from_value::<JsonRpcRequest>(value) {
                    Ok(request) => self.handle(request).await,
                    Err(e) => Some(JsonRpcResponse::error(
                        id,
                        JsonRpcError::invalid_request(format!("Invalid Request: {}", e)),
                    )),
                }
            }
        };

        response.and_then(|r| match serde_json::to_string(&r) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response");
                None
            }
        })
    }

    /// Dispatch a parsed request. Notifications produce no response.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                request.id.unwrap_or(serde_json::Value::Null),
                JsonRpcError::invalid_request("jsonrpc must be \"2.0\""),
            ));
        }

        tracing::debug!(
            method = %request.method,
            notification = request.is_notification(),
            "Handling request"
        );

        let Some(id) = request.id else {
            self.handle_notification(&request.method);
            return None;
        };

        let outcome = match request.method.as_str() {
            "initialize" => self.initialize(request.params),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => to_value(ListToolsResult {
                tools: self.tools.list_schemas(),
            }),
            "tools/call" => self.call_tool(request.params).await,
            "resources/list" => to_value(ListResourcesResult {
                resources: self.resources.list(),
            }),
            "resources/templates/list" => to_value(ListResourceTemplatesResult {
                resource_templates: self.resources.templates(),
            }),
            "resources/read" => self.read_resource(request.params).await,
            "prompts/list" => to_value(ListPromptsResult {
                prompts: self.prompts.list(),
            }),
            "prompts/get" => self.get_prompt(request.params),
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    fn handle_notification(&self, method: &str) {
        match method {
            "notifications/initialized" => tracing::info!("Client initialized"),
            "notifications/cancelled" => tracing::debug!("Client cancelled a request"),
            other => tracing::debug!(method = other, "Ignoring notification"),
        }
    }

    fn initialize(&self, params: Option<serde_json::Value>) -> Result<serde_json::Value, JsonRpcError> {
        // Clients that omit params still get a usable handshake
        if let Some(params) = params {
            match serde_json::from_value::<InitializeParams>(params) {
                Ok(p) => tracing::info!(
                    client = %p.client_info.name,
                    client_version = %p.client_info.version,
                    protocol = %p.protocol_version,
                    "Client connected"
                ),
                Err(e) => tracing::debug!(error = %e, "Unrecognized initialize params"),
            }
        }

        to_value(InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ListChangedCapability::default()),
                resources: Some(ResourcesCapability::default()),
                prompts: Some(ListChangedCapability::default()),
            },
            server_info: self.info.clone(),
        })
    }

    async fn call_tool(&self, params: Option<serde_json::Value>) -> Result<serde_json::Value, JsonRpcError> {
        let params: CallToolParams = parse_params(params)?;
        let arguments = params
            .arguments
            .unwrap_or_else(|| serde_json::Value::Object(Default::default()));

        tracing::info!(tool = %params.name, "Calling tool");
        match self.tools.call(&params.name, arguments).await {
            Some(result) => to_value(result),
            None => Err(JsonRpcError::invalid_params(format!(
                "Unknown tool: {}",
                params.name
            ))),
        }
    }

    async fn read_resource(&self, params: Option<serde_json::Value>) -> Result<serde_json::Value, JsonRpcError> {
        let params: ReadResourceParams = parse_params(params)?;
        let resources = Arc::clone(&self.resources);
        let uri = params.uri.clone();

        let contents = tokio::task::spawn_blocking(move || resources.read(&uri))
            .await
            .map_err(|e| JsonRpcError::internal_error(format!("Resource task failed: {}", e)))?;

        match contents {
            Ok(contents) => to_value(ReadResourceResult {
                contents: vec![contents],
            }),
            Err(ResourceError::NotFound(uri)) => Err(JsonRpcError::resource_not_found(&uri)),
            Err(e @ ResourceError::Denied(_)) => Err(JsonRpcError::invalid_params(e.to_string())),
            Err(e @ ResourceError::Failed(_)) => Err(JsonRpcError::internal_error(e.to_string())),
        }
    }

    fn get_prompt(&self, params: Option<serde_json::Value>) -> Result<serde_json::Value, JsonRpcError> {
        let params: GetPromptParams = parse_params(params)?;
        let result = self
            .prompts
            .get(&params.name, &params.arguments)
            .map_err(|e: PromptError| JsonRpcError::invalid_params(e.to_string()))?;
        to_value(result)
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<serde_json::Value>) -> Result<T, JsonRpcError> {
    let params = params.ok_or_else(|| JsonRpcError::invalid_params("Missing params"))?;
    serde_json::from_value(params)
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {}", e)))
}

fn to_value(value: impl serde::Serialize) -> Result<serde_json::Value, JsonRpcError> {
    serde_json::to_value(value)
        .map_err(|e| JsonRpcError::internal_error(format!("Failed to serialize result: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn server() -> (TempDir, McpServer) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("proj/src")).unwrap();
        std::fs::write(root.join("proj/src/a.ts"), "// c\n\nlet x = 1;\n").unwrap();
        std::fs::write(
            root.join("proj/package.json"),
            r#"{"name":"proj","dependencies":{"a":"1.0.0"},"devDependencies":{"b":"2.0.0"}}"#,
        )
        .unwrap();

        let config = ServerConfig {
            root: root.to_path_buf(),
            ..Default::default()
        };
        (temp_dir, McpServer::from_config(&config))
    }

    async fn request(server: &McpServer, body: Value) -> Value {
        let line = server.handle_line(&body.to_string()).await.unwrap();
        serde_json::from_str(&line).unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let (_dir, server) = server();
        let resp = request(
            &server,
            json!({
                "jsonrpc": "2.0", "id": 1, "method": "initialize",
                "params": {
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {},
                    "clientInfo": { "name": "test", "version": "1.0" }
                }
            }),
        )
        .await;

        assert_eq!(resp["id"], 1);
        assert_eq!(resp["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(resp["result"]["serverInfo"]["name"], "atelier");
        assert!(resp["result"]["capabilities"]["prompts"].is_object());
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let (_dir, server) = server();
        let line = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }).to_string();
        assert!(server.handle_line(&line).await.is_none());
        assert!(server.handle_line("   ").await.is_none());
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let (_dir, server) = server();

        let resp: Value = serde_json::from_str(&server.handle_line("{oops").await.unwrap()).unwrap();
        assert_eq!(resp["error"]["code"], JsonRpcError::PARSE_ERROR);
        assert_eq!(resp["id"], Value::Null);

        let resp = request(&server, json!({ "jsonrpc": "1.0", "id": 2, "method": "ping" })).await;
        assert_eq!(resp["error"]["code"], JsonRpcError::INVALID_REQUEST);

        let resp = request(&server, json!({ "jsonrpc": "2.0", "id": 3, "method": "nope" })).await;
        assert_eq!(resp["error"]["code"], JsonRpcError::METHOD_NOT_FOUND);

        let resp = request(&server, json!({ "jsonrpc": "2.0", "id": 4, "method": "tools/call" })).await;
        assert_eq!(resp["error"]["code"], JsonRpcError::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_tools_list() {
        let (_dir, server) = server();
        let resp = request(&server, json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list" })).await;

        let names: Vec<&str> = resp["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        for expected in [
            "analyze_dependencies",
            "analyze_structure",
            "calculate",
            "count_lines",
            "get_current_time",
            "random_number",
            "reverse_string",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }

    #[tokio::test]
    async fn test_tools_call() {
        let (_dir, server) = server();
        let resp = request(
            &server,
            json!({
                "jsonrpc": "2.0", "id": 9, "method": "tools/call",
                "params": { "name": "count_lines", "arguments": { "path": "proj" } }
            }),
        )
        .await;

        assert!(resp["result"].get("isError").is_none());
        let text = resp["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("Comment lines: 1"));
    }

    #[tokio::test]
    async fn test_tools_call_schema_violation() {
        let (_dir, server) = server();
        let resp = request(
            &server,
            json!({
                "jsonrpc": "2.0", "id": 5, "method": "tools/call",
                "params": { "name": "analyze_structure", "arguments": { "path": "proj", "maxDepth": 11 } }
            }),
        )
        .await;
        assert_eq!(resp["result"]["isError"], true);

        let resp = request(
            &server,
            json!({
                "jsonrpc": "2.0", "id": 6, "method": "tools/call",
                "params": { "name": "does_not_exist", "arguments": {} }
            }),
        )
        .await;
        assert_eq!(resp["error"]["code"], JsonRpcError::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_resources() {
        let (_dir, server) = server();
        let resp = request(&server, json!({ "jsonrpc": "2.0", "id": 1, "method": "resources/list" })).await;
        assert_eq!(resp["result"]["resources"].as_array().unwrap().len(), 2);

        let resp = request(
            &server,
            json!({ "jsonrpc": "2.0", "id": 2, "method": "resources/templates/list" }),
        )
        .await;
        assert_eq!(resp["result"]["resourceTemplates"].as_array().unwrap().len(), 3);

        let resp = request(
            &server,
            json!({
                "jsonrpc": "2.0", "id": 3, "method": "resources/read",
                "params": { "uri": "atelier://project/proj/manifest" }
            }),
        )
        .await;
        assert!(resp["result"]["contents"][0]["text"]
            .as_str()
            .unwrap()
            .contains("\"proj\""));

        let resp = request(
            &server,
            json!({
                "jsonrpc": "2.0", "id": 4, "method": "resources/read",
                "params": { "uri": "unknown://thing" }
            }),
        )
        .await;
        assert_eq!(resp["error"]["code"], JsonRpcError::RESOURCE_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_prompts() {
        let (_dir, server) = server();
        let resp = request(&server, json!({ "jsonrpc": "2.0", "id": 1, "method": "prompts/list" })).await;
        assert_eq!(resp["result"]["prompts"].as_array().unwrap().len(), 3);

        let resp = request(
            &server,
            json!({
                "jsonrpc": "2.0", "id": 2, "method": "prompts/get",
                "params": { "name": "explain_concept", "arguments": { "concept": "lifetimes" } }
            }),
        )
        .await;
        assert_eq!(resp["result"]["messages"][0]["role"], "user");

        let resp = request(
            &server,
            json!({
                "jsonrpc": "2.0", "id": 3, "method": "prompts/get",
                "params": { "name": "code_review", "arguments": {} }
            }),
        )
        .await;
        assert_eq!(resp["error"]["code"], JsonRpcError::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_serve_over_duplex() {
        let (_dir, server) = server();
        let (mut client, server_io) = tokio::io::duplex(64 * 1024);
        let (reader, writer) = tokio::io::split(server_io);

        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        client
            .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n")
            .await
            .unwrap();
        client
            .write_all(b"{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n")
            .await
            .unwrap();
        client.shutdown().await.unwrap();

        server.serve(reader, writer).await.unwrap();

        let mut output = String::new();
        client.read_to_string(&mut output).await.unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1);
        let resp: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(resp["id"], 1);
        assert_eq!(resp["result"], json!({}));
    }
}
