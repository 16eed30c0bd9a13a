//! Test support - 스크립팅 호스트 목 구현
//!
//! (target, member) 쌍에 대해 미리 정해둔 응답을 돌려주는 transport.
//! 같은 키에 여러 응답을 쌓으면 순서대로 소비하고 마지막 값은 유지된다.

use crate::bridge::{ObjectHandle, ScriptTransport, ScriptValue};
use async_trait::async_trait;
use davinci_foundation::{Error, Result};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub struct MockTransport {
    responses: Mutex<HashMap<(u64, String), VecDeque<ScriptValue>>>,
    calls: Mutex<Vec<(u64, String, Vec<ScriptValue>)>>,
    connected: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            connected: AtomicBool::new(true),
        })
    }

    /// 응답 등록
    pub fn on(&self, target: u64, member: &str, value: ScriptValue) {
        self.responses
            .lock()
            .unwrap()
            .entry((target, member.to_string()))
            .or_default()
            .push_back(value);
    }

    /// 객체 응답 등록 (핸들 + 클래스)
    pub fn on_object(&self, target: u64, member: &str, id: u64, class: &str) {
        self.on(
            target,
            member,
            ScriptValue::Object(ObjectHandle {
                id,
                class: class.to_string(),
            }),
        );
    }

    /// 기록된 호출 목록
    pub fn calls(&self) -> Vec<(u64, String, Vec<ScriptValue>)> {
        self.calls.lock().unwrap().clone()
    }

    /// 특정 멤버가 호출됐는지 확인
    pub fn called(&self, member: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|(_, m, _)| m == member)
    }

    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl ScriptTransport for MockTransport {
    async fn invoke(
        &self,
        target: u64,
        member: &str,
        args: Vec<ScriptValue>,
    ) -> Result<ScriptValue> {
        self.calls
            .lock()
            .unwrap()
            .push((target, member.to_string(), args));

        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(&(target, member.to_string())) {
            Some(queue) if !queue.is_empty() => {
                if queue.len() > 1 {
                    Ok(queue.pop_front().unwrap())
                } else {
                    Ok(queue.front().unwrap().clone())
                }
            }
            _ => Err(Error::script(
                member,
                format!("no scripted response for target {}", target),
            )),
        }
    }

    async fn release(&self, _handle: u64) -> Result<()> {
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
