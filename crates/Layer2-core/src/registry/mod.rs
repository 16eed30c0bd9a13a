//! Tool Registry - 도구 등록 및 디스패치
//!
//! 도구 이름 → (ToolSpec, 핸들러) 평면 레지스트리.
//!
//! ## 기능
//! - 도구 등록/조회
//! - MCP 호환 스키마 (`schemas()`)
//! - 균일한 성공/에러 봉투로 감싸는 실행 (`execute()`)
//! - 시작 시 등록 정합성 검증 (`validate()`)
//!
//! ## 사용법
//! ```ignore
//! let mut registry = ToolRegistry::new();
//! components::register_all(&mut registry);
//!
//! let result = registry.execute("open_page", &bridge, json!({"page_name": "edit"})).await;
//! ```

use crate::api::Bridge;
use davinci_foundation::{Component, Result, ToolSpec};
use futures::future::BoxFuture;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// 핸들러 future 타입
pub type HandlerFuture = BoxFuture<'static, Result<Value>>;

/// 도구 핸들러
pub type Handler = Arc<dyn Fn(Bridge, Value) -> HandlerFuture + Send + Sync>;

/// async fn을 핸들러로 감싸기
pub fn wrap<F, Fut>(f: F) -> Handler
where
    F: Fn(Bridge, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    Arc::new(move |bridge, args| Box::pin(f(bridge, args)))
}

/// 등록된 도구 (스펙 + 핸들러)
pub struct RegisteredTool {
    pub spec: ToolSpec,
    handler: Handler,
}

/// 도구 레지스트리
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
    /// 등록 순서 (schemas 출력 안정화)
    order: Vec<String>,
    /// 중복 등록 시도 (검증 리포트용)
    duplicates: Vec<String>,
}

impl ToolRegistry {
    /// 빈 레지스트리 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 도구 등록
    ///
    /// 같은 이름이 이미 있으면 경고만 남기고 먼저 등록된 항목을 유지한다.
    pub fn register(&mut self, spec: ToolSpec, handler: Handler) {
        let name = spec.name.clone();
        if self.tools.contains_key(&name) {
            warn!("Duplicate tool registration ignored: {}", name);
            self.duplicates.push(name);
            return;
        }
        self.order.push(name.clone());
        self.tools.insert(name, RegisteredTool { spec, handler });
    }

    /// 도구 조회
    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    /// 도구 존재 여부
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// 도구 개수
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// 비어있는지 확인
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// 모든 도구 이름 (등록 순서)
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// 모든 도구 스펙 (등록 순서)
    pub fn specs(&self) -> impl Iterator<Item = &ToolSpec> {
        self.order
            .iter()
            .filter_map(move |name| self.tools.get(name).map(|t| &t.spec))
    }

    /// MCP 호환 스키마 목록 (tools/list 응답용)
    pub fn schemas(&self) -> Vec<Value> {
        self.specs()
            .map(|spec| {
                json!({
                    "name": spec.name,
                    "description": spec.description,
                    "inputSchema": spec.input_schema(),
                })
            })
            .collect()
    }

    /// 컴포넌트별 도구 스펙
    pub fn by_component(&self) -> BTreeMap<Component, Vec<&ToolSpec>> {
        let mut result: BTreeMap<Component, Vec<&ToolSpec>> = BTreeMap::new();
        for spec in self.specs() {
            result.entry(spec.component).or_default().push(spec);
        }
        result
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// 도구 실행
    ///
    /// 결과는 항상 봉투 형태다:
    /// - 성공: `{"success": true, "result": ...}`
    /// - 실패: `{"success": false, "error": "..."}` (알 수 없는 도구 포함)
    pub async fn execute(&self, name: &str, bridge: &Bridge, args: Value) -> Value {
        let start = Instant::now();

        let envelope = match self.tools.get(name) {
            None => json!({
                "success": false,
                "error": format!("Tool not found: {}", name),
                "message": "Use tools/list to see available tools",
            }),
            Some(tool) => match (tool.handler)(bridge.clone(), args).await {
                Ok(result) => json!({ "success": true, "result": result }),
                Err(e) => json!({ "success": false, "error": e.to_string() }),
            },
        };

        debug!(
            "Tool '{}' executed in {}ms, success: {}",
            name,
            start.elapsed().as_millis(),
            envelope["success"]
        );

        envelope
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// 등록 정합성 검증
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        for name in &self.duplicates {
            report
                .critical
                .push(format!("{}: duplicate registration", name));
        }

        for spec in self.specs() {
            if spec.description.trim().is_empty() {
                report
                    .critical
                    .push(format!("{}: empty description", spec.name));
            }
            if spec.description.len() > 1024 {
                report
                    .warnings
                    .push(format!("{}: description longer than 1024 chars", spec.name));
            }

            let mut seen = std::collections::HashSet::new();
            for param in &spec.params {
                if !seen.insert(param.name.as_str()) {
                    report.critical.push(format!(
                        "{}: duplicate parameter '{}'",
                        spec.name, param.name
                    ));
                }
                if param.name.trim().is_empty() {
                    report
                        .critical
                        .push(format!("{}: unnamed parameter", spec.name));
                }
            }

            // 필수 파라미터가 선택 파라미터 뒤에 오면 스키마는 유효하지만
            // 사람이 읽는 문서 순서가 어긋난다
            let mut saw_optional = false;
            for param in &spec.params {
                if !param.required {
                    saw_optional = true;
                } else if saw_optional {
                    report.warnings.push(format!(
                        "{}: required parameter '{}' listed after optional ones",
                        spec.name, param.name
                    ));
                }
            }
        }

        report
    }
}

/// 검증 리포트 (critical / warning 분리)
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub critical: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.critical.is_empty()
    }

    /// 헬스 체크용 요약 JSON
    pub fn summary(&self) -> Value {
        json!({
            "passed": self.passed(),
            "critical_error_count": self.critical.len(),
            "warning_count": self.warnings.len(),
            "critical_errors": self.critical,
            "warnings": self.warnings,
        })
    }

    /// strict 모드: critical이 있으면 에러로 변환
    pub fn into_result(self) -> Result<ValidationReport> {
        if self.passed() {
            Ok(self)
        } else {
            Err(davinci_foundation::Error::Validation(format!(
                "Tool validation failed with {} critical errors: {}",
                self.critical.len(),
                self.critical.join("; ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use davinci_foundation::ParamKind;

    async fn ok_handler(_bridge: Bridge, _args: Value) -> Result<Value> {
        Ok(json!({ "page": "edit" }))
    }

    async fn err_handler(_bridge: Bridge, _args: Value) -> Result<Value> {
        Err(davinci_foundation::Error::Validation("bad input".into()))
    }

    fn test_bridge() -> Bridge {
        Bridge::new(MockTransport::new())
    }

    fn sample_spec(name: &str) -> ToolSpec {
        ToolSpec::new(name, "A test tool", Component::Resolve)
            .required("page_name", ParamKind::String, "Page name")
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(sample_spec("open_page"), wrap(ok_handler));

        assert!(registry.contains("open_page"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.names(), vec!["open_page"]);
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let mut registry = ToolRegistry::new();
        registry.register(sample_spec("open_page"), wrap(ok_handler));
        registry.register(
            ToolSpec::new("open_page", "Second registration", Component::Timeline),
            wrap(err_handler),
        );

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("open_page").unwrap().spec.description, "A test tool");

        let report = registry.validate();
        assert!(!report.passed());
        assert!(report.critical[0].contains("duplicate registration"));
    }

    #[test]
    fn test_schemas_shape() {
        let mut registry = ToolRegistry::new();
        registry.register(sample_spec("open_page"), wrap(ok_handler));

        let schemas = registry.schemas();
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0]["name"], "open_page");
        assert!(schemas[0]["inputSchema"]["properties"]["page_name"].is_object());
    }

    #[tokio::test]
    async fn test_execute_success_envelope() {
        let mut registry = ToolRegistry::new();
        registry.register(sample_spec("open_page"), wrap(ok_handler));

        let envelope = registry
            .execute("open_page", &test_bridge(), json!({}))
            .await;
        assert_eq!(envelope["success"], true);
        assert_eq!(envelope["result"]["page"], "edit");
    }

    #[tokio::test]
    async fn test_execute_error_envelope() {
        let mut registry = ToolRegistry::new();
        registry.register(sample_spec("failing"), wrap(err_handler));

        let envelope = registry.execute("failing", &test_bridge(), json!({})).await;
        assert_eq!(envelope["success"], false);
        assert!(envelope["error"].as_str().unwrap().contains("bad input"));
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let registry = ToolRegistry::new();
        let envelope = registry.execute("nope", &test_bridge(), json!({})).await;
        assert_eq!(envelope["success"], false);
        assert!(envelope["error"].as_str().unwrap().contains("Tool not found"));
        assert!(envelope["message"].as_str().unwrap().contains("tools/list"));
    }

    #[test]
    fn test_validate_flags_empty_description() {
        let mut registry = ToolRegistry::new();
        registry.register(
            ToolSpec::new("bad_tool", "", Component::Resolve),
            wrap(ok_handler),
        );
        let report = registry.validate();
        assert!(!report.passed());
        assert!(report.into_result().is_err());
    }

    #[test]
    fn test_validate_warns_on_param_order() {
        let mut registry = ToolRegistry::new();
        registry.register(
            ToolSpec::new("odd_order", "Params out of order", Component::Resolve)
                .optional("first", ParamKind::String, "optional first")
                .required("second", ParamKind::String, "required second"),
            wrap(ok_handler),
        );
        let report = registry.validate();
        assert!(report.passed());
        assert_eq!(report.warnings.len(), 1);
    }
}
