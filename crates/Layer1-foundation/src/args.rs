//! Argument extraction - 도구 호출 인자 추출
//!
//! 모든 도구 인자는 JSON object로 전달된다. 이 모듈은 존재/타입 검사만
//! 수행하고 값은 그대로 통과시킨다 (식별자는 단순 조회 키).

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// 필수 인자 추출
///
/// 인자가 없거나 null이면 `MissingParam`, 타입이 맞지 않으면 `InvalidParam`.
pub fn required<T: DeserializeOwned>(args: &Value, name: &str) -> Result<T> {
    match args.get(name) {
        None | Some(Value::Null) => Err(Error::MissingParam(name.to_string())),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| Error::invalid_param(name, e.to_string())),
    }
}

/// 선택 인자 추출 (없으면 None)
pub fn optional<T: DeserializeOwned>(args: &Value, name: &str) -> Result<Option<T>> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| Error::invalid_param(name, e.to_string())),
    }
}

/// 선택 인자 추출 (없으면 기본값)
pub fn optional_or<T: DeserializeOwned>(args: &Value, name: &str, default: T) -> Result<T> {
    Ok(optional(args, name)?.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_present() {
        let args = json!({ "page_name": "edit" });
        let page: String = required(&args, "page_name").unwrap();
        assert_eq!(page, "edit");
    }

    #[test]
    fn test_required_missing() {
        let args = json!({});
        let err = required::<String>(&args, "page_name").unwrap_err();
        assert!(matches!(err, Error::MissingParam(name) if name == "page_name"));
    }

    #[test]
    fn test_required_null_counts_as_missing() {
        let args = json!({ "page_name": null });
        assert!(required::<String>(&args, "page_name").is_err());
    }

    #[test]
    fn test_required_wrong_type() {
        let args = json!({ "frame_id": "not-a-number" });
        let err = required::<i64>(&args, "frame_id").unwrap_err();
        assert!(matches!(err, Error::InvalidParam { name, .. } if name == "frame_id"));
    }

    #[test]
    fn test_optional() {
        let args = json!({ "custom_data": "x" });
        assert_eq!(optional::<String>(&args, "custom_data").unwrap(), Some("x".into()));
        assert_eq!(optional::<String>(&args, "missing").unwrap(), None);
        assert_eq!(optional_or(&args, "missing", 5_i64).unwrap(), 5);
    }
}
