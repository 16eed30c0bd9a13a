//! Bridge - 스크립팅 호스트 브리지
//!
//! 네이티브 API 연결은 외부 애플리케이션(스크립팅 호스트)이 소유하고,
//! 이 모듈은 그 연결로 가는 채널만 관리한다.
//!
//! - `value`: 와이어 값 모델 (`ScriptValue`, 객체 핸들)
//! - `transport`: 라인 단위 JSON 요청/응답 (`ScriptTransport`)
//! - `host`: 플랫폼별 호스트 탐색 및 실행

mod host;
mod transport;
mod value;

pub use host::{host_env, locate_python, spawn_host, HOST_SOURCE};
pub use transport::{HostRequest, HostResponse, PyHostTransport, ScriptTransport};
pub use value::{ObjectHandle, ScriptValue, ROOT_HANDLE};
