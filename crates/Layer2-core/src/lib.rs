//! # davinci-core
//!
//! Core runtime for davinci-mcp:
//! - Bridge: 스크립팅 호스트 전송 계층 (값 모델, stdio transport, 호스트 탐색)
//! - Api: 객체 그래프 파사드 (Remote, Bridge, ID 조회)
//! - Registry: 도구 레지스트리 (등록, 스키마, 디스패치, 검증)
//! - Components: 13개 컴포넌트의 도구 구현
//!
//! ## 아키텍처
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  ToolRegistry                                             │
//! │  ├── register(spec, handler)                              │
//! │  ├── schemas() - MCP tools/list                           │
//! │  └── execute() - {"success", "result"/"error"} 봉투       │
//! ├──────────────────────────────────────────────────────────┤
//! │  Components (resolve, project, media_pool, timeline, ...) │
//! │  각 도구: 인자 검사 → 네이티브 호출 1회 → 결과 포장       │
//! ├──────────────────────────────────────────────────────────┤
//! │  Bridge / Remote (객체 그래프 탐색, ID 조회)              │
//! ├──────────────────────────────────────────────────────────┤
//! │  ScriptTransport (PyHost: 라인 단위 JSON stdio)           │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod bridge;
pub mod components;
pub mod registry;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================
pub use api::{Bridge, Remote};
pub use bridge::{spawn_host, PyHostTransport, ScriptTransport, ScriptValue};
pub use registry::{Handler, RegisteredTool, ToolRegistry, ValidationReport};

/// 전체 도구가 등록된 레지스트리 생성
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    components::register_all(&mut registry);
    registry
}
