//! API - 객체 그래프 파사드
//!
//! 핸들 기반 `Remote` 객체와, 탐색/조회 진입점 `Bridge`.

mod bridge;
mod remote;

pub use bridge::Bridge;
pub use remote::Remote;
