//! Script Transport - 스크립팅 호스트 전송 계층
//!
//! 스크립팅 호스트 프로세스와의 통신:
//! - PyHost: 파이썬 호스트 프로세스와 stdin/stdout 라인 단위 JSON 통신
//!
//! 연결 자체(네이티브 API 세션)는 외부 애플리케이션이 소유한다. 이 계층은
//! 요청/응답 채널만 관리한다.

use super::value::ScriptValue;
use async_trait::async_trait;
use davinci_foundation::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot, Mutex, RwLock};
use tracing::{debug, error, info};

// ============================================================================
// Wire types
// ============================================================================

/// 호스트 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostRequest {
    pub id: u64,
    pub op: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<u64>,
}

impl HostRequest {
    pub fn invoke(id: u64, target: u64, member: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            id,
            op: "invoke".to_string(),
            target: Some(target),
            member: Some(member.into()),
            args: Some(args),
            handle: None,
        }
    }

    pub fn release(id: u64, handle: u64) -> Self {
        Self {
            id,
            op: "release".to_string(),
            target: None,
            member: None,
            args: None,
            handle: Some(handle),
        }
    }

    pub fn ping(id: u64) -> Self {
        Self {
            id,
            op: "ping".to_string(),
            target: None,
            member: None,
            args: None,
            handle: None,
        }
    }
}

/// 호스트 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostResponse {
    pub id: Option<u64>,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Transport trait
// ============================================================================

/// Script Transport trait
#[async_trait]
pub trait ScriptTransport: Send + Sync {
    /// 대상 객체의 멤버 호출
    async fn invoke(&self, target: u64, member: &str, args: Vec<ScriptValue>)
        -> Result<ScriptValue>;

    /// 객체 핸들 해제
    async fn release(&self, handle: u64) -> Result<()>;

    /// 연결 종료
    async fn close(&self) -> Result<()>;

    /// 연결 상태 확인
    fn is_connected(&self) -> bool;
}

// ============================================================================
// PyHost Transport
// ============================================================================

/// PyHost Transport - 파이썬 스크립팅 호스트 프로세스 기반 통신
pub struct PyHostTransport {
    /// 요청 ID 카운터
    request_id: AtomicU64,

    /// 자식 프로세스
    child: Arc<Mutex<Option<Child>>>,

    /// stdin writer
    stdin_tx: mpsc::Sender<String>,

    /// 대기 중인 요청들 (id -> response sender)
    pending_requests: Arc<RwLock<HashMap<u64, oneshot::Sender<HostResponse>>>>,

    /// 연결 상태
    connected: Arc<AtomicBool>,

    /// 요청 타임아웃
    timeout: Duration,
}

impl PyHostTransport {
    /// 호스트 프로세스 시작 및 transport 생성
    pub async fn spawn(
        command: &str,
        args: &[String],
        env: &HashMap<String, String>,
        timeout: Duration,
    ) -> Result<Self> {
        info!("Spawning scripting host: {} {:?}", command, args);

        let mut cmd = Command::new(command);
        cmd.args(args)
            .envs(env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            Error::Connection(format!(
                "Failed to spawn scripting host '{}': {}",
                command, e
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Connection("Failed to capture stdin".to_string()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Connection("Failed to capture stdout".to_string()))?;

        let stderr = child.stderr.take();

        // 요청 전송용 채널
        let (stdin_tx, mut stdin_rx) = mpsc::channel::<String>(32);

        // 대기 중인 요청
        let pending_requests: Arc<RwLock<HashMap<u64, oneshot::Sender<HostResponse>>>> =
            Arc::new(RwLock::new(HashMap::new()));
        let pending_for_reader = Arc::clone(&pending_requests);

        let connected = Arc::new(AtomicBool::new(true));
        let connected_for_writer = Arc::clone(&connected);
        let connected_for_reader = Arc::clone(&connected);

        // stdin writer task
        let mut stdin_writer = stdin;
        tokio::spawn(async move {
            while let Some(msg) = stdin_rx.recv().await {
                if let Err(e) = stdin_writer.write_all(msg.as_bytes()).await {
                    error!("Failed to write to host stdin: {}", e);
                    connected_for_writer.store(false, Ordering::SeqCst);
                    break;
                }
                if let Err(e) = stdin_writer.flush().await {
                    error!("Failed to flush host stdin: {}", e);
                    connected_for_writer.store(false, Ordering::SeqCst);
                    break;
                }
            }
        });

        // stdout reader task
        let mut reader = BufReader::new(stdout).lines();
        tokio::spawn(async move {
            while let Ok(Some(line)) = reader.next_line().await {
                debug!("host stdout: {}", line);

                match serde_json::from_str::<HostResponse>(&line) {
                    Ok(response) => {
                        if let Some(id) = response.id {
                            let mut pending = pending_for_reader.write().await;
                            if let Some(sender) = pending.remove(&id) {
                                let _ = sender.send(response);
                            }
                        }
                    }
                    Err(e) => {
                        debug!("Non-protocol line from host: {}", e);
                    }
                }
            }
            connected_for_reader.store(false, Ordering::SeqCst);
            info!("Scripting host stdout reader finished");
        });

        // stderr는 진단용으로만 로깅
        if let Some(stderr) = stderr {
            let mut reader = BufReader::new(stderr).lines();
            tokio::spawn(async move {
                while let Ok(Some(line)) = reader.next_line().await {
                    debug!("host stderr: {}", line);
                }
            });
        }

        Ok(Self {
            request_id: AtomicU64::new(1),
            child: Arc::new(Mutex::new(Some(child))),
            stdin_tx,
            pending_requests,
            connected,
            timeout,
        })
    }

    /// 다음 요청 ID 생성
    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::SeqCst)
    }

    /// 요청 전송 및 응답 대기
    async fn request(&self, request: HostRequest) -> Result<HostResponse> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }

        let id = request.id;
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending_requests.write().await;
            pending.insert(id, tx);
        }

        let msg = serde_json::to_string(&request)?;
        debug!("Sending host request: {}", msg);

        if self.stdin_tx.send(format!("{}\n", msg)).await.is_err() {
            let mut pending = self.pending_requests.write().await;
            pending.remove(&id);
            return Err(Error::Connection("Host stdin channel closed".to_string()));
        }

        let response = match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(response)) => response,
            Ok(Err(_)) => {
                return Err(Error::Connection(
                    "Host response channel closed".to_string(),
                ))
            }
            Err(_) => {
                let mut pending = self.pending_requests.write().await;
                pending.remove(&id);
                return Err(Error::Timeout(format!(
                    "Host request timed out after {}s",
                    self.timeout.as_secs()
                )));
            }
        };

        Ok(response)
    }

    /// 호스트 연결 확인 (ping)
    pub async fn ping(&self) -> Result<()> {
        let response = self.request(HostRequest::ping(self.next_id())).await?;
        if response.ok {
            Ok(())
        } else {
            Err(Error::Connection(
                response.error.unwrap_or_else(|| "ping failed".to_string()),
            ))
        }
    }
}

#[async_trait]
impl ScriptTransport for PyHostTransport {
    async fn invoke(
        &self,
        target: u64,
        member: &str,
        args: Vec<ScriptValue>,
    ) -> Result<ScriptValue> {
        let wire_args = args.iter().map(|a| a.to_wire()).collect();
        let request = HostRequest::invoke(self.next_id(), target, member, wire_args);
        let response = self.request(request).await?;

        if !response.ok {
            return Err(Error::script(
                member,
                response
                    .error
                    .unwrap_or_else(|| "unknown host error".to_string()),
            ));
        }

        Ok(response
            .value
            .as_ref()
            .map(ScriptValue::from_wire)
            .unwrap_or(ScriptValue::Null))
    }

    async fn release(&self, handle: u64) -> Result<()> {
        let request = HostRequest::release(self.next_id(), handle);
        self.request(request).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);

        let mut child_guard = self.child.lock().await;
        if let Some(mut child) = child_guard.take() {
            let _ = child.kill().await;
        }

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_request_invoke_wire() {
        let request = HostRequest::invoke(1, 0, "OpenPage", vec![serde_json::json!("edit")]);
        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(
            wire,
            serde_json::json!({
                "id": 1, "op": "invoke", "target": 0,
                "member": "OpenPage", "args": ["edit"],
            })
        );
    }

    #[test]
    fn test_host_request_release_omits_invoke_fields() {
        let request = HostRequest::release(2, 9);
        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(wire, serde_json::json!({ "id": 2, "op": "release", "handle": 9 }));
    }

    #[test]
    fn test_host_response_parse() {
        let ok: HostResponse =
            serde_json::from_str(r#"{"id": 1, "ok": true, "value": {"$obj": 3, "$class": "Project"}}"#)
                .unwrap();
        assert!(ok.ok);
        assert!(ok.value.is_some());

        let err: HostResponse =
            serde_json::from_str(r#"{"id": 2, "ok": false, "error": "no such member"}"#).unwrap();
        assert!(!err.ok);
        assert_eq!(err.error.as_deref(), Some("no such member"));
    }
}
