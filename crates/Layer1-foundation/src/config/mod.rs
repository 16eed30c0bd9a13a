//! Server Config - 통합 설정
//!
//! 기본값 → 글로벌 설정 파일(~/.davinci-mcp/config.json) → 환경 변수 순서로
//! 병합한다. 플랫폼별 스크립팅 경로 기본값은 Resolve 설치 규약을 따른다.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 설정 파일명
pub const CONFIG_FILE: &str = "config.json";

/// 설정 디렉터리명 (홈 디렉터리 하위)
pub const CONFIG_DIR: &str = ".davinci-mcp";

/// 요청 타임아웃 기본값 (초)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Server Config
// ============================================================================

/// davinci-mcp 통합 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// 파이썬 바이너리 (없으면 PATH에서 탐색)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,

    /// Resolve 스크립팅 API 디렉터리 (RESOLVE_SCRIPT_API)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_api: Option<PathBuf>,

    /// fusionscript 라이브러리 경로 (RESOLVE_SCRIPT_LIB)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_lib: Option<PathBuf>,

    /// 스크립팅 호스트 요청 타임아웃 (초)
    pub request_timeout_secs: u64,

    /// 로그 파일 경로 (stderr 외 추가 기록)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// 시작 시 레지스트리 검증 실패를 에러로 처리
    pub strict_validation: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            python: None,
            script_api: None,
            script_lib: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_file: None,
            strict_validation: false,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Load / Merge
    // ========================================================================

    /// 글로벌 설정 파일 + 환경 변수 병합 로드
    pub fn load() -> Result<Self> {
        let mut config = Self::new();

        if let Some(path) = Self::global_path() {
            if let Some(file_config) = Self::load_file(&path)? {
                config.merge(file_config);
            }
        }

        config.apply_env();
        Ok(config)
    }

    /// 글로벌 설정 파일 경로 (~/.davinci-mcp/config.json)
    pub fn global_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// 설정 파일 로드 (없으면 None)
    pub fn load_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(Some(config))
    }

    /// 다른 설정의 값으로 덮어쓰기 (None 필드는 유지)
    pub fn merge(&mut self, other: ServerConfig) {
        if other.python.is_some() {
            self.python = other.python;
        }
        if other.script_api.is_some() {
            self.script_api = other.script_api;
        }
        if other.script_lib.is_some() {
            self.script_lib = other.script_lib;
        }
        if other.request_timeout_secs != DEFAULT_TIMEOUT_SECS {
            self.request_timeout_secs = other.request_timeout_secs;
        }
        if other.log_file.is_some() {
            self.log_file = other.log_file;
        }
        if other.strict_validation {
            self.strict_validation = true;
        }
    }

    /// 환경 변수 적용
    fn apply_env(&mut self) {
        if let Ok(python) = std::env::var("DAVINCI_MCP_PYTHON") {
            if !python.is_empty() {
                self.python = Some(python);
            }
        }
        if let Ok(api) = std::env::var("RESOLVE_SCRIPT_API") {
            if !api.is_empty() {
                self.script_api = Some(PathBuf::from(api));
            }
        }
        if let Ok(lib) = std::env::var("RESOLVE_SCRIPT_LIB") {
            if !lib.is_empty() {
                self.script_lib = Some(PathBuf::from(lib));
            }
        }
        if let Ok(timeout) = std::env::var("DAVINCI_MCP_TIMEOUT") {
            if let Ok(secs) = timeout.parse() {
                self.request_timeout_secs = secs;
            }
        }
    }

    // ========================================================================
    // Platform paths
    // ========================================================================

    /// 스크립팅 API 디렉터리 (설정값 또는 플랫폼 기본값)
    pub fn script_api_dir(&self) -> PathBuf {
        self.script_api
            .clone()
            .unwrap_or_else(default_script_api_dir)
    }

    /// fusionscript 라이브러리 경로 (설정값 또는 플랫폼 기본값)
    pub fn script_lib_path(&self) -> PathBuf {
        self.script_lib
            .clone()
            .unwrap_or_else(default_script_lib_path)
    }

    /// DaVinciResolveScript 모듈 디렉터리 (API 디렉터리/Modules)
    pub fn modules_dir(&self) -> PathBuf {
        self.script_api_dir().join("Modules")
    }
}

/// 플랫폼별 스크립팅 API 디렉터리 기본값
pub fn default_script_api_dir() -> PathBuf {
    if cfg!(target_os = "macos") {
        PathBuf::from(
            "/Library/Application Support/Blackmagic Design/DaVinci Resolve/Developer/Scripting",
        )
    } else if cfg!(target_os = "windows") {
        let program_data =
            std::env::var("PROGRAMDATA").unwrap_or_else(|_| "C:\\ProgramData".to_string());
        PathBuf::from(program_data)
            .join("Blackmagic Design")
            .join("DaVinci Resolve")
            .join("Support")
            .join("Developer")
            .join("Scripting")
    } else {
        PathBuf::from("/opt/resolve/Developer/Scripting")
    }
}

/// 플랫폼별 fusionscript 라이브러리 기본값
pub fn default_script_lib_path() -> PathBuf {
    if cfg!(target_os = "macos") {
        PathBuf::from(
            "/Applications/DaVinci Resolve/DaVinci Resolve.app/Contents/Libraries/Fusion/fusionscript.so",
        )
    } else if cfg!(target_os = "windows") {
        PathBuf::from("C:\\Program Files\\Blackmagic Design\\DaVinci Resolve\\fusionscript.dll")
    } else {
        PathBuf::from("/opt/resolve/libs/Fusion/fusionscript.so")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.python.is_none());
        assert!(!config.strict_validation);
    }

    #[test]
    fn test_merge_keeps_existing_when_other_empty() {
        let mut config = ServerConfig {
            python: Some("python3.11".into()),
            ..Default::default()
        };
        config.merge(ServerConfig::default());
        assert_eq!(config.python.as_deref(), Some("python3.11"));
    }

    #[test]
    fn test_merge_overrides() {
        let mut config = ServerConfig::default();
        config.merge(ServerConfig {
            python: Some("python3".into()),
            request_timeout_secs: 60,
            strict_validation: true,
            ..Default::default()
        });
        assert_eq!(config.python.as_deref(), Some("python3"));
        assert_eq!(config.request_timeout_secs, 60);
        assert!(config.strict_validation);
    }

    #[test]
    fn test_load_file_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        assert!(ServerConfig::load_file(&path).unwrap().is_none());
    }

    #[test]
    fn test_load_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "python": "python3", "requestTimeoutSecs": 10 }"#).unwrap();
        let config = ServerConfig::load_file(&path).unwrap().unwrap();
        assert_eq!(config.python.as_deref(), Some("python3"));
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_load_file_invalid_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            ServerConfig::load_file(&path),
            Err(crate::Error::Config(_))
        ));
    }

    #[test]
    fn test_modules_dir_is_under_api_dir() {
        let config = ServerConfig {
            script_api: Some(PathBuf::from("/tmp/scripting")),
            ..Default::default()
        };
        assert_eq!(config.modules_dir(), PathBuf::from("/tmp/scripting/Modules"));
    }
}
