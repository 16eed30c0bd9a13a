//! Script Value - 스크립팅 호스트 값 모델
//!
//! 네이티브 API가 돌려주는 값은 JSON 원시값 + 라이브 객체 핸들의 혼합이다.
//! 와이어 포맷에서 객체는 `{"$obj": id, "$class": name}`으로 인코딩된다.

use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// 라이브 API 객체 핸들
///
/// 핸들 0은 Resolve 애플리케이션 객체 자신이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectHandle {
    pub id: u64,
    pub class: String,
}

/// Resolve 애플리케이션 객체의 고정 핸들
pub const ROOT_HANDLE: u64 = 0;

/// 스크립팅 호스트와 주고받는 값
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ScriptValue>),
    Map(BTreeMap<String, ScriptValue>),
    Object(ObjectHandle),
}

impl ScriptValue {
    // ========================================================================
    // Wire format
    // ========================================================================

    /// 와이어 JSON에서 디코딩
    pub fn from_wire(value: &Value) -> ScriptValue {
        match value {
            Value::Null => ScriptValue::Null,
            Value::Bool(b) => ScriptValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ScriptValue::Int(i)
                } else {
                    ScriptValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            Value::String(s) => ScriptValue::Str(s.clone()),
            Value::Array(items) => {
                ScriptValue::List(items.iter().map(ScriptValue::from_wire).collect())
            }
            Value::Object(map) => {
                if let Some(id) = map.get("$obj").and_then(Value::as_u64) {
                    let class = map
                        .get("$class")
                        .and_then(Value::as_str)
                        .unwrap_or("Unknown")
                        .to_string();
                    return ScriptValue::Object(ObjectHandle { id, class });
                }
                ScriptValue::Map(
                    map.iter()
                        .map(|(k, v)| (k.clone(), ScriptValue::from_wire(v)))
                        .collect(),
                )
            }
        }
    }

    /// 와이어 JSON으로 인코딩 (호출 인자용)
    pub fn to_wire(&self) -> Value {
        match self {
            ScriptValue::Null => Value::Null,
            ScriptValue::Bool(b) => json!(b),
            ScriptValue::Int(i) => json!(i),
            ScriptValue::Float(f) => json!(f),
            ScriptValue::Str(s) => json!(s),
            ScriptValue::List(items) => Value::Array(items.iter().map(|v| v.to_wire()).collect()),
            ScriptValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_wire()))
                    .collect::<Map<String, Value>>(),
            ),
            ScriptValue::Object(handle) => json!({ "$obj": handle.id, "$class": handle.class }),
        }
    }

    /// 도구 결과용 JSON으로 변환
    ///
    /// 객체 핸들은 `{"handle", "type"}`으로 노출된다.
    pub fn to_json(&self) -> Value {
        match self {
            ScriptValue::Null => Value::Null,
            ScriptValue::Bool(b) => json!(b),
            ScriptValue::Int(i) => json!(i),
            ScriptValue::Float(f) => json!(f),
            ScriptValue::Str(s) => json!(s),
            ScriptValue::List(items) => Value::Array(items.iter().map(|v| v.to_json()).collect()),
            ScriptValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
            ScriptValue::Object(handle) => {
                json!({ "handle": handle.id, "type": handle.class })
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn is_null(&self) -> bool {
        matches!(self, ScriptValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScriptValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ScriptValue::Int(i) => Some(*i),
            ScriptValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScriptValue::Int(i) => Some(*i as f64),
            ScriptValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScriptValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ScriptValue]> {
        match self {
            ScriptValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectHandle> {
        match self {
            ScriptValue::Object(handle) => Some(handle),
            _ => None,
        }
    }

    /// 파이썬식 진리값 (빈 문자열/0/None/빈 목록은 거짓)
    ///
    /// 네이티브 API의 일부 메서드는 성공 여부를 임의 타입으로 돌려준다.
    pub fn is_truthy(&self) -> bool {
        match self {
            ScriptValue::Null => false,
            ScriptValue::Bool(b) => *b,
            ScriptValue::Int(i) => *i != 0,
            ScriptValue::Float(f) => *f != 0.0,
            ScriptValue::Str(s) => !s.is_empty(),
            ScriptValue::List(items) => !items.is_empty(),
            ScriptValue::Map(map) => !map.is_empty(),
            ScriptValue::Object(_) => true,
        }
    }
}

// ============================================================================
// From 구현 (호출 인자 구성용)
// ============================================================================

impl From<bool> for ScriptValue {
    fn from(b: bool) -> Self {
        ScriptValue::Bool(b)
    }
}

impl From<i64> for ScriptValue {
    fn from(i: i64) -> Self {
        ScriptValue::Int(i)
    }
}

impl From<f64> for ScriptValue {
    fn from(f: f64) -> Self {
        ScriptValue::Float(f)
    }
}

impl From<&str> for ScriptValue {
    fn from(s: &str) -> Self {
        ScriptValue::Str(s.to_string())
    }
}

impl From<String> for ScriptValue {
    fn from(s: String) -> Self {
        ScriptValue::Str(s)
    }
}

impl From<&String> for ScriptValue {
    fn from(s: &String) -> Self {
        ScriptValue::Str(s.clone())
    }
}

impl From<&Value> for ScriptValue {
    fn from(v: &Value) -> Self {
        ScriptValue::from_wire(v)
    }
}

impl From<Value> for ScriptValue {
    fn from(v: Value) -> Self {
        ScriptValue::from_wire(&v)
    }
}

impl From<ObjectHandle> for ScriptValue {
    fn from(handle: ObjectHandle) -> Self {
        ScriptValue::Object(handle)
    }
}

impl<T: Into<ScriptValue>> From<Vec<T>> for ScriptValue {
    fn from(items: Vec<T>) -> Self {
        ScriptValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// 호출 인자 목록 구성 매크로
///
/// ```ignore
/// let args = script_args!["edit", 30_i64, true];
/// ```
#[macro_export]
macro_rules! script_args {
    () => { Vec::<$crate::bridge::ScriptValue>::new() };
    ($($arg:expr),+ $(,)?) => {
        vec![$($crate::bridge::ScriptValue::from($arg)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_roundtrip_primitives() {
        let wire = json!([null, true, 3, 2.5, "edit"]);
        let value = ScriptValue::from_wire(&wire);
        assert_eq!(value.to_wire(), wire);
    }

    #[test]
    fn test_wire_object_handle() {
        let wire = json!({ "$obj": 7, "$class": "Timeline" });
        let value = ScriptValue::from_wire(&wire);
        let handle = value.as_object().unwrap();
        assert_eq!(handle.id, 7);
        assert_eq!(handle.class, "Timeline");
        assert_eq!(value.to_wire(), wire);
    }

    #[test]
    fn test_to_json_renders_handles() {
        let value = ScriptValue::Object(ObjectHandle {
            id: 3,
            class: "MediaPool".into(),
        });
        assert_eq!(value.to_json(), json!({ "handle": 3, "type": "MediaPool" }));
    }

    #[test]
    fn test_nested_map_with_handle() {
        let wire = json!({ "timeline": { "$obj": 1, "$class": "Timeline" }, "count": 2 });
        let value = ScriptValue::from_wire(&wire);
        match &value {
            ScriptValue::Map(map) => {
                assert!(map["timeline"].as_object().is_some());
                assert_eq!(map["count"].as_i64(), Some(2));
            }
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn test_truthiness() {
        assert!(ScriptValue::from("x").is_truthy());
        assert!(!ScriptValue::from("").is_truthy());
        assert!(!ScriptValue::Null.is_truthy());
        assert!(ScriptValue::from(1_i64).is_truthy());
    }

    #[test]
    fn test_script_args_macro() {
        let args = script_args!["edit", 3_i64, true];
        assert_eq!(args.len(), 3);
        assert_eq!(args[0].as_str(), Some("edit"));
        assert_eq!(args[1].as_i64(), Some(3));
        assert_eq!(args[2].as_bool(), Some(true));
        assert!(script_args!().is_empty());
    }
}
