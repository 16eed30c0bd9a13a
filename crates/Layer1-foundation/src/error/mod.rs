//! Error types for davinci-mcp
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// davinci-mcp 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 스크립팅 호스트 연결 관련
    // ========================================================================
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Not connected to DaVinci Resolve")]
    NotConnected,

    #[error("Script call failed: {member} - {message}")]
    Script { member: String, message: String },

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    // ========================================================================
    // Tool 관련
    // ========================================================================
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Missing required parameter: {0}")]
    MissingParam(String),

    #[error("Invalid parameter '{name}': {message}")]
    InvalidParam { name: String, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    // ========================================================================
    // 실행 관련
    // ========================================================================
    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Cancelled")]
    Cancelled,

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// 재시도 가능한 에러인지 확인
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Timeout(_) | Error::Connection(_) | Error::NotConnected
        )
    }

    /// 사용자(MCP 클라이언트)에게 그대로 보여줄 수 있는 에러인지 확인
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::NotConnected
                | Error::ObjectNotFound(_)
                | Error::ToolNotFound(_)
                | Error::MissingParam(_)
                | Error::InvalidParam { .. }
                | Error::Validation(_)
                | Error::Cancelled
        )
    }

    /// Script 호출 에러 생성 헬퍼
    pub fn script(member: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Script {
            member: member.into(),
            message: message.into(),
        }
    }

    /// 파라미터 에러 생성 헬퍼
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidParam {
            name: name.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(Error::NotConnected.is_retryable());
        assert!(Error::Timeout("request".into()).is_retryable());
        assert!(!Error::ToolNotFound("open_page".into()).is_retryable());
    }

    #[test]
    fn test_user_facing_classification() {
        assert!(Error::MissingParam("page_name".into()).is_user_facing());
        assert!(Error::Validation("invalid page".into()).is_user_facing());
        assert!(!Error::Internal("boom".into()).is_user_facing());
    }

    #[test]
    fn test_script_error_display() {
        let err = Error::script("OpenPage", "no such page");
        assert_eq!(err.to_string(), "Script call failed: OpenPage - no such page");
    }
}
