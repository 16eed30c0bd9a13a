//! Core Types - 도구 등록 레코드
//!
//! 레지스트리에 등록되는 정적 도구 정보 (이름, 설명, 컴포넌트, 파라미터)

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// ============================================================================
// Component
// ============================================================================

/// 도구가 속한 컴포넌트 (Resolve API 객체 패밀리)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Resolve,
    ProjectManager,
    Project,
    MediaStorage,
    MediaPool,
    MediaPoolItem,
    Timeline,
    TimelineItem,
    Folder,
    Gallery,
    GalleryStillAlbum,
    Graph,
    ColorGroup,
}

impl Component {
    /// 모든 컴포넌트 (레지스트리 검사용)
    pub const ALL: [Component; 13] = [
        Component::Resolve,
        Component::ProjectManager,
        Component::Project,
        Component::MediaStorage,
        Component::MediaPool,
        Component::MediaPoolItem,
        Component::Timeline,
        Component::TimelineItem,
        Component::Folder,
        Component::Gallery,
        Component::GalleryStillAlbum,
        Component::Graph,
        Component::ColorGroup,
    ];

    /// snake_case 이름 (원본 레지스트리의 component 필드와 동일)
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Resolve => "resolve",
            Component::ProjectManager => "project_manager",
            Component::Project => "project",
            Component::MediaStorage => "media_storage",
            Component::MediaPool => "media_pool",
            Component::MediaPoolItem => "media_pool_item",
            Component::Timeline => "timeline",
            Component::TimelineItem => "timeline_item",
            Component::Folder => "folder",
            Component::Gallery => "gallery",
            Component::GalleryStillAlbum => "gallery_still_album",
            Component::Graph => "graph",
            Component::ColorGroup => "color_group",
        }
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Parameters
// ============================================================================

/// 파라미터 타입
///
/// 원본 API의 union 타입("string or integer" 등)도 그대로 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    StringOrInteger,
    StringOrObject,
}

impl ParamKind {
    /// JSON Schema 조각으로 변환
    pub fn schema(&self) -> Value {
        match self {
            ParamKind::String => json!({ "type": "string" }),
            ParamKind::Integer => json!({ "type": "integer" }),
            ParamKind::Number => json!({ "type": "number" }),
            ParamKind::Boolean => json!({ "type": "boolean" }),
            ParamKind::Array => json!({ "type": "array" }),
            ParamKind::Object => json!({ "type": "object" }),
            ParamKind::StringOrInteger => {
                json!({ "oneOf": [{ "type": "string" }, { "type": "integer" }] })
            }
            ParamKind::StringOrObject => {
                json!({ "oneOf": [{ "type": "string" }, { "type": "object" }] })
            }
        }
    }
}

/// 파라미터 디스크립터
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    /// 파라미터 이름
    pub name: String,

    /// 타입
    pub kind: ParamKind,

    /// 설명
    pub description: String,

    /// 필수 여부
    pub required: bool,
}

// ============================================================================
// Tool Spec
// ============================================================================

/// 정적 도구 등록 레코드
///
/// ## 사용법
/// ```ignore
/// let spec = ToolSpec::new("open_page", "Switch to the specified page", Component::Resolve)
///     .required("page_name", ParamKind::String, "Page name");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// 도구 이름 (레지스트리 키)
    pub name: String,

    /// 설명
    pub description: String,

    /// 소속 컴포넌트
    pub component: Component,

    /// 파라미터 목록
    pub params: Vec<ParamSpec>,
}

impl ToolSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        component: Component,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            component,
            params: Vec::new(),
        }
    }

    /// 필수 파라미터 추가
    pub fn required(
        mut self,
        name: impl Into<String>,
        kind: ParamKind,
        description: impl Into<String>,
    ) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            kind,
            description: description.into(),
            required: true,
        });
        self
    }

    /// 선택 파라미터 추가
    pub fn optional(
        mut self,
        name: impl Into<String>,
        kind: ParamKind,
        description: impl Into<String>,
    ) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            kind,
            description: description.into(),
            required: false,
        });
        self
    }

    /// MCP 호환 inputSchema (JSON Schema object)
    pub fn input_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &self.params {
            let mut schema = param.kind.schema();
            if let Some(obj) = schema.as_object_mut() {
                obj.insert("description".to_string(), json!(param.description));
            }
            properties.insert(param.name.clone(), schema);
            if param.required {
                required.push(json!(param.name));
            }
        }

        json!({
            "type": "object",
            "properties": Value::Object(properties),
            "required": required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_names() {
        assert_eq!(Component::MediaPoolItem.as_str(), "media_pool_item");
        assert_eq!(Component::ALL.len(), 13);
    }

    #[test]
    fn test_input_schema() {
        let spec = ToolSpec::new("open_page", "Switch page", Component::Resolve)
            .required("page_name", ParamKind::String, "Page name")
            .optional("force", ParamKind::Boolean, "Force switch");

        let schema = spec.input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["page_name"]["type"], "string");
        assert_eq!(schema["properties"]["page_name"]["description"], "Page name");
        assert_eq!(schema["required"], json!(["page_name"]));
    }

    #[test]
    fn test_union_kind_schema() {
        let schema = ParamKind::StringOrInteger.schema();
        assert!(schema.get("oneOf").is_some());
    }
}
