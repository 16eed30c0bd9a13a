//! MCP Server - stdio 서버 루프
//!
//! stdin에서 JSON-RPC 요청을 한 줄씩 읽어 처리하고 stdout으로 응답한다.
//! 도구 호출은 단일 요청/응답으로 동기 처리된다. 진단 출력은 전부 stderr
//! (stdout은 프로토콜 전용).
//!
//! 스크립팅 호스트 연결은 지연 생성된다: Resolve가 꺼져 있어도 서버는
//! 시작하고, 각 도구 호출이 연결 실패를 에러 봉투로 보고한다.

use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION};
use davinci_core::{spawn_host, Bridge, ToolRegistry};
use davinci_foundation::{Result, ServerConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// 스크립팅 호스트 연결 (지연 생성 + 끊김 시 재생성)
pub struct Connection {
    config: ServerConfig,
    bridge: Mutex<Option<Bridge>>,
}

impl Connection {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            bridge: Mutex::new(None),
        }
    }

    /// 연결된 Bridge 반환 (필요 시 호스트 spawn)
    pub async fn bridge(&self) -> Result<Bridge> {
        let mut guard = self.bridge.lock().await;

        if let Some(bridge) = guard.as_ref() {
            if bridge.is_connected() {
                return Ok(bridge.clone());
            }
            warn!("Scripting host connection lost, respawning");
            *guard = None;
        }

        let transport = spawn_host(&self.config).await?;
        let bridge = Bridge::new(Arc::new(transport));
        *guard = Some(bridge.clone());
        Ok(bridge)
    }
}

/// MCP 서버
pub struct McpServer {
    registry: ToolRegistry,
    connection: Connection,
}

impl McpServer {
    pub fn new(registry: ToolRegistry, config: ServerConfig) -> Self {
        Self {
            registry,
            connection: Connection::new(config),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    // ========================================================================
    // Request handling
    // ========================================================================

    /// 한 줄 처리: 응답 라인 또는 None(알림)
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                debug!("Failed to parse request: {}", e);
                let response =
                    JsonRpcResponse::failure(Value::Null, JsonRpcError::parse_error());
                return serde_json::to_string(&response).ok();
            }
        };

        let response = self.handle_request(request).await?;
        serde_json::to_string(&response).ok()
    }

    /// 요청 디스패치 (알림이면 None)
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != "2.0" {
            let id = request.id.unwrap_or(Value::Null);
            return Some(JsonRpcResponse::failure(id, JsonRpcError::invalid_request()));
        }

        if request.is_notification() {
            debug!("Notification: {}", request.method);
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": { "tools": {} },
                    "serverInfo": {
                        "name": "davinci-mcp",
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }),
            ),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(
                id,
                json!({ "tools": self.registry.schemas() }),
            ),
            "tools/call" => self.handle_tool_call(id, request.params).await,
            other => {
                warn!("Unknown method: {}", other);
                JsonRpcResponse::failure(id, JsonRpcError::method_not_found(other))
            }
        };

        Some(response)
    }

    /// tools/call: 레지스트리 실행 결과를 MCP content로 포장
    async fn handle_tool_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params = params.unwrap_or(Value::Null);
        let name = match params.get("name").and_then(Value::as_str) {
            Some(name) => name.to_string(),
            None => {
                return JsonRpcResponse::failure(
                    id,
                    JsonRpcError::invalid_params("tools/call requires a tool name"),
                )
            }
        };
        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        info!("Executing tool '{}'", name);

        // 모르는 도구는 호스트를 띄우지 않는다
        let envelope = if !self.registry.contains(&name) {
            json!({
                "success": false,
                "error": format!("Tool not found: {}", name),
                "message": "Use tools/list to see available tools",
            })
        } else {
            match self.connection.bridge().await {
                Ok(bridge) => self.registry.execute(&name, &bridge, arguments).await,
                Err(e) => {
                    error!("Bridge unavailable: {}", e);
                    json!({
                        "success": false,
                        "error": format!("Could not connect to DaVinci Resolve: {}", e),
                    })
                }
            }
        };

        let is_error = envelope["success"] != json!(true);
        let text = serde_json::to_string_pretty(&envelope)
            .unwrap_or_else(|_| envelope.to_string());

        JsonRpcResponse::success(
            id,
            json!({
                "content": [{ "type": "text", "text": text }],
                "isError": is_error,
            }),
        )
    }

    // ========================================================================
    // Serve loop
    // ========================================================================

    /// stdin이 닫히거나 종료 시그널이 올 때까지 요청 처리
    pub async fn serve(&self) -> Result<()> {
        info!(
            "Starting DaVinci Resolve MCP server ({} tools registered)",
            self.registry.len()
        );

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin).lines();
        let mut stdout = tokio::io::stdout();

        loop {
            tokio::select! {
                line = reader.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            let line = line.trim();
                            if line.is_empty() {
                                continue;
                            }
                            if let Some(response) = self.handle_line(line).await {
                                stdout.write_all(response.as_bytes()).await?;
                                stdout.write_all(b"\n").await?;
                                stdout.flush().await?;
                            }
                        }
                        Ok(None) => {
                            info!("Client closed stdin, shutting down");
                            break;
                        }
                        Err(e) => {
                            error!("Failed to read from stdin: {}", e);
                            break;
                        }
                    }
                }
                _ = shutdown_signal() => {
                    info!("Received signal to shut down MCP server");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// SIGINT 또는 SIGTERM 대기
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use davinci_core::default_registry;

    fn test_server() -> McpServer {
        McpServer::new(default_registry(), ServerConfig::default())
    }

    fn request(id: Value, method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(id),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn test_initialize() {
        let server = test_server();
        let response = server
            .handle_request(request(json!(1), "initialize", None))
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "davinci-mcp");
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_tools_list_contains_registered_tools() {
        let server = test_server();
        let response = server
            .handle_request(request(json!("list-1"), "tools/list", None))
            .await
            .unwrap();

        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), server.registry().len());
        assert!(tools.iter().any(|t| t["name"] == "open_page"));
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool_is_error_content() {
        let server = test_server();
        let response = server
            .handle_request(request(
                json!(2),
                "tools/call",
                Some(json!({ "name": "no_such_tool", "arguments": {} })),
            ))
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("Tool not found"));
    }

    #[tokio::test]
    async fn test_tools_call_without_name_is_invalid_params() {
        let server = test_server();
        let response = server
            .handle_request(request(json!(3), "tools/call", Some(json!({}))))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let server = test_server();
        let response = server
            .handle_line(r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = test_server();
        let response = server
            .handle_request(request(json!(4), "resources/list", None))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_parse_error_response() {
        let server = test_server();
        let response = server.handle_line("not json at all").await.unwrap();
        let parsed: JsonRpcResponse = serde_json::from_str(&response).unwrap();
        assert_eq!(parsed.error.unwrap().code, -32700);
        assert_eq!(parsed.id, Value::Null);
    }
}
