//! Startup validation - 환경/연결 점검
//!
//! `doctor` 서브커맨드가 사용한다. 각 점검은 통과/경고/실패로 보고되고,
//! 실패가 있어도 나머지 점검을 계속한다.

use davinci_core::{bridge, default_registry, ScriptTransport};
use davinci_foundation::ServerConfig;

/// 점검 결과 하나
#[derive(Debug)]
pub struct Check {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

impl Check {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: true,
            detail: detail.into(),
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: false,
            detail: detail.into(),
        }
    }
}

/// 전체 점검 실행
pub async fn run_checks(config: &ServerConfig) -> Vec<Check> {
    let mut checks = Vec::new();

    // 1. 파이썬 인터프리터
    match bridge::locate_python(config) {
        Ok(path) => checks.push(Check::pass("python", path.display().to_string())),
        Err(e) => checks.push(Check::fail("python", e.to_string())),
    }

    // 2. Resolve 스크립팅 모듈 디렉터리
    let modules_dir = config.modules_dir();
    if modules_dir.exists() {
        checks.push(Check::pass("scripting-modules", modules_dir.display().to_string()));
    } else {
        checks.push(Check::fail(
            "scripting-modules",
            format!("directory not found: {}", modules_dir.display()),
        ));
    }

    // 3. fusionscript 라이브러리
    let lib_path = config.script_lib_path();
    if lib_path.exists() {
        checks.push(Check::pass("fusionscript", lib_path.display().to_string()));
    } else {
        checks.push(Check::fail(
            "fusionscript",
            format!("library not found: {}", lib_path.display()),
        ));
    }

    // 4. Resolve 연결 (호스트 spawn + ping)
    match bridge::spawn_host(config).await {
        Ok(transport) => {
            checks.push(Check::pass("resolve-connection", "connected"));
            let _ = transport.close().await;
        }
        Err(e) => checks.push(Check::fail("resolve-connection", e.to_string())),
    }

    // 5. 도구 레지스트리 정합성
    let registry = default_registry();
    let report = registry.validate();
    if report.passed() {
        checks.push(Check::pass(
            "tool-registry",
            format!(
                "{} tools registered, {} warnings",
                registry.len(),
                report.warnings.len()
            ),
        ));
    } else {
        checks.push(Check::fail(
            "tool-registry",
            format!("{} critical errors", report.critical.len()),
        ));
    }

    checks
}

/// doctor 출력
pub async fn doctor(config: &ServerConfig) -> bool {
    let checks = run_checks(config).await;
    let mut all_passed = true;

    println!("davinci-mcp doctor");
    println!();
    for check in &checks {
        let mark = if check.passed { "ok" } else { "FAIL" };
        println!("  [{:^4}] {:<20} {}", mark, check.name, check.detail);
        if !check.passed {
            all_passed = false;
        }
    }
    println!();
    if all_passed {
        println!("All checks passed.");
    } else {
        println!("Some checks failed. The server will still start, but tool calls");
        println!("will report errors until DaVinci Resolve is reachable.");
    }

    all_passed
}
