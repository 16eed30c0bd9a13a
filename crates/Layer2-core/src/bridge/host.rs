//! Host discovery - 스크립팅 호스트 탐색 및 실행
//!
//! 플랫폼별 Resolve 스크립팅 모듈 경로를 찾아 파이썬 호스트 프로세스를
//! 띄운다. 호스트 스크립트는 바이너리에 내장되어 `-c`로 전달된다.

use super::transport::PyHostTransport;
use davinci_foundation::{Error, Result, ServerConfig};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// 내장 스크립팅 호스트 소스
pub const HOST_SOURCE: &str = include_str!("../../../../scripts/resolve_host.py");

/// 파이썬 바이너리 후보 (설정 오버라이드가 없을 때)
const PYTHON_CANDIDATES: [&str; 2] = ["python3", "python"];

/// 파이썬 바이너리 탐색
pub fn locate_python(config: &ServerConfig) -> Result<PathBuf> {
    if let Some(python) = &config.python {
        return which::which(python).map_err(|e| {
            Error::Config(format!("Configured python '{}' not found: {}", python, e))
        });
    }

    for candidate in PYTHON_CANDIDATES {
        if let Ok(path) = which::which(candidate) {
            return Ok(path);
        }
    }

    Err(Error::Config(
        "No python interpreter found on PATH (set DAVINCI_MCP_PYTHON)".to_string(),
    ))
}

/// 호스트 프로세스 환경 변수 구성
///
/// PYTHONPATH에 Resolve 모듈 디렉터리를 추가하고 RESOLVE_SCRIPT_* 변수를
/// 설정한다.
pub fn host_env(config: &ServerConfig) -> HashMap<String, String> {
    let mut env = HashMap::new();

    let modules_dir = config.modules_dir();
    let modules = modules_dir.display().to_string();
    let separator = if cfg!(target_os = "windows") { ";" } else { ":" };
    let python_path = match std::env::var("PYTHONPATH") {
        Ok(existing) if !existing.is_empty() => format!("{}{}{}", existing, separator, modules),
        _ => modules,
    };

    env.insert("PYTHONPATH".to_string(), python_path);
    env.insert(
        "RESOLVE_SCRIPT_API".to_string(),
        config.script_api_dir().display().to_string(),
    );
    env.insert(
        "RESOLVE_SCRIPT_LIB".to_string(),
        config.script_lib_path().display().to_string(),
    );
    env.insert("PYTHONUNBUFFERED".to_string(), "1".to_string());

    env
}

/// 스크립팅 호스트 실행
///
/// 서버는 Resolve가 꺼져 있어도 시작하므로, 여기서의 실패는 호출 시점에
/// 에러 응답으로 전달된다.
pub async fn spawn_host(config: &ServerConfig) -> Result<PyHostTransport> {
    let modules_dir = config.modules_dir();
    if !modules_dir.exists() {
        warn!(
            "DaVinci Resolve scripting modules directory not found: {}",
            modules_dir.display()
        );
    }

    let python = locate_python(config)?;
    info!("Using python interpreter: {}", python.display());

    let args = vec!["-c".to_string(), HOST_SOURCE.to_string()];
    let env = host_env(config);
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let transport =
        PyHostTransport::spawn(&python.display().to_string(), &args, &env, timeout).await?;

    // 연결 확인: 호스트가 Resolve에 붙지 못하면 즉시 종료된다
    transport.ping().await.map_err(|e| {
        Error::Connection(format!("Could not connect to DaVinci Resolve: {}", e))
    })?;

    info!("Scripting host connected");
    Ok(transport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_source_embedded() {
        assert!(HOST_SOURCE.contains("DaVinciResolveScript"));
        assert!(HOST_SOURCE.contains("\"$obj\"") || HOST_SOURCE.contains("$obj"));
    }

    #[test]
    fn test_host_env_sets_script_paths() {
        let config = ServerConfig {
            script_api: Some(PathBuf::from("/tmp/scripting")),
            script_lib: Some(PathBuf::from("/tmp/fusionscript.so")),
            ..Default::default()
        };
        let env = host_env(&config);
        assert_eq!(env["RESOLVE_SCRIPT_API"], "/tmp/scripting");
        assert_eq!(env["RESOLVE_SCRIPT_LIB"], "/tmp/fusionscript.so");
        assert!(env["PYTHONPATH"].contains("/tmp/scripting/Modules"));
    }

    #[test]
    fn test_locate_python_with_bad_override() {
        let config = ServerConfig {
            python: Some("definitely-not-a-real-python-binary".to_string()),
            ..Default::default()
        };
        assert!(matches!(locate_python(&config), Err(Error::Config(_))));
    }
}
