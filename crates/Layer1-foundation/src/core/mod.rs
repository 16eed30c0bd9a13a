//! Core - 도구 등록 레코드 타입

mod types;

pub use types::{Component, ParamKind, ParamSpec, ToolSpec};
