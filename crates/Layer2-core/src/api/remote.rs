//! Remote - 핸들 기반 원격 객체
//!
//! 네이티브 API 객체 하나를 가리키는 얇은 래퍼. 모든 호출은 PascalCase
//! 멤버 이름 그대로 스크립팅 호스트에 전달된다.

use crate::bridge::{ObjectHandle, ScriptTransport, ScriptValue, ROOT_HANDLE};
use davinci_foundation::{Error, Result};
use serde_json::Value;
use std::sync::Arc;

/// 원격 API 객체
#[derive(Clone)]
pub struct Remote {
    transport: Arc<dyn ScriptTransport>,
    handle: u64,
    class: String,
}

impl Remote {
    pub fn new(transport: Arc<dyn ScriptTransport>, handle: u64, class: impl Into<String>) -> Self {
        Self {
            transport,
            handle,
            class: class.into(),
        }
    }

    /// Resolve 애플리케이션 객체 (핸들 0)
    pub fn root(transport: Arc<dyn ScriptTransport>) -> Self {
        Self::new(transport, ROOT_HANDLE, "Resolve")
    }

    pub fn handle(&self) -> u64 {
        self.handle
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    /// 핸들에서 Remote 구성
    pub fn from_handle(&self, handle: &ObjectHandle) -> Remote {
        Remote::new(Arc::clone(&self.transport), handle.id, handle.class.clone())
    }

    // ========================================================================
    // Calls
    // ========================================================================

    /// 멤버 호출 (원시 결과)
    pub async fn invoke(&self, member: &str, args: Vec<ScriptValue>) -> Result<ScriptValue> {
        self.transport.invoke(self.handle, member, args).await
    }

    /// 진리값으로 해석되는 호출 (성공 플래그 류)
    pub async fn call_bool(&self, member: &str, args: Vec<ScriptValue>) -> Result<bool> {
        Ok(self.invoke(member, args).await?.is_truthy())
    }

    /// 문자열을 돌려주는 호출
    pub async fn call_str(&self, member: &str, args: Vec<ScriptValue>) -> Result<String> {
        let value = self.invoke(member, args).await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::script(member, format!("expected string, got {:?}", value)))
    }

    /// 문자열 또는 None을 돌려주는 호출
    pub async fn call_opt_str(&self, member: &str, args: Vec<ScriptValue>) -> Result<Option<String>> {
        let value = self.invoke(member, args).await?;
        if value.is_null() {
            return Ok(None);
        }
        value
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| Error::script(member, format!("expected string, got {:?}", value)))
    }

    /// 정수를 돌려주는 호출
    pub async fn call_i64(&self, member: &str, args: Vec<ScriptValue>) -> Result<i64> {
        let value = self.invoke(member, args).await?;
        value
            .as_i64()
            .ok_or_else(|| Error::script(member, format!("expected integer, got {:?}", value)))
    }

    /// 결과를 도구 출력용 JSON으로 돌려주는 호출
    pub async fn call_value(&self, member: &str, args: Vec<ScriptValue>) -> Result<Value> {
        Ok(self.invoke(member, args).await?.to_json())
    }

    /// 객체를 돌려주는 호출 (null이면 ObjectNotFound)
    pub async fn call_object(&self, member: &str, args: Vec<ScriptValue>) -> Result<Remote> {
        match self.call_opt_object(member, args).await? {
            Some(remote) => Ok(remote),
            None => Err(Error::ObjectNotFound(format!(
                "{}.{} returned no object",
                self.class, member
            ))),
        }
    }

    /// 객체 또는 None을 돌려주는 호출
    pub async fn call_opt_object(
        &self,
        member: &str,
        args: Vec<ScriptValue>,
    ) -> Result<Option<Remote>> {
        let value = self.invoke(member, args).await?;
        match &value {
            ScriptValue::Null => Ok(None),
            ScriptValue::Object(handle) => Ok(Some(self.from_handle(handle))),
            other => Err(Error::script(
                member,
                format!("expected object, got {:?}", other),
            )),
        }
    }

    /// 객체 목록을 돌려주는 호출 (null은 빈 목록으로 취급)
    pub async fn call_objects(&self, member: &str, args: Vec<ScriptValue>) -> Result<Vec<Remote>> {
        let value = self.invoke(member, args).await?;
        match &value {
            ScriptValue::Null => Ok(Vec::new()),
            ScriptValue::List(items) => Ok(items
                .iter()
                .filter_map(|item| item.as_object().map(|h| self.from_handle(h)))
                .collect()),
            other => Err(Error::script(
                member,
                format!("expected list, got {:?}", other),
            )),
        }
    }

    /// 도구 결과용 핸들 요약
    pub fn to_json(&self) -> Value {
        serde_json::json!({ "handle": self.handle, "type": self.class })
    }
}

impl std::fmt::Debug for Remote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Remote({}#{})", self.class, self.handle)
    }
}

impl From<&Remote> for ScriptValue {
    fn from(remote: &Remote) -> Self {
        ScriptValue::Object(ObjectHandle {
            id: remote.handle,
            class: remote.class.clone(),
        })
    }
}
