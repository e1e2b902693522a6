//! Scripted transport for exercising the channel and its callers without a
//! backend.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::{CallError, CallResult};
use crate::request::{ApiRequest, Method};
use crate::transport::Transport;

enum Reply {
    Ready(CallResult<Value>),
    Gated(oneshot::Receiver<CallResult<Value>>),
}

#[derive(Default)]
struct Script {
    queued: HashMap<String, VecDeque<Reply>>,
    fallback: HashMap<String, CallResult<Value>>,
    sent: Vec<ApiRequest>,
}

/// Replies are matched by `METHOD /path`: queued replies first, in order,
/// then the route's fallback reply, if any.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

/// Held-back reply; the call stays pending until resolved.
pub struct Gate {
    tx: oneshot::Sender<CallResult<Value>>,
}

impl Gate {
    pub fn resolve(self, payload: Value) {
        let _ = self.tx.send(Ok(payload));
    }

    pub fn fail(self, message: &str) {
        let _ = self.tx.send(Err(CallError::Transport(message.to_string())));
    }
}

fn route(method: Method, path: &str) -> String {
    format!("{method} {path}")
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.script()
            .queued
            .entry(route(method, path))
            .or_default()
            .push_back(reply);
    }

    pub fn reply(&self, method: Method, path: &str, payload: Value) {
        self.push(method, path, Reply::Ready(Ok(payload)));
    }

    pub fn fail(&self, method: Method, path: &str, message: &str) {
        self.push(
            method,
            path,
            Reply::Ready(Err(CallError::Transport(message.to_string()))),
        );
    }

    pub fn gate(&self, method: Method, path: &str) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, Reply::Gated(rx));
        Gate { tx }
    }

    /// Reply used whenever the route has nothing queued.
    pub fn always(&self, method: Method, path: &str, payload: Value) {
        self.script()
            .fallback
            .insert(route(method, path), Ok(payload));
    }

    pub fn sent(&self) -> Vec<ApiRequest> {
        self.script().sent.clone()
    }

    pub fn sent_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        let wanted = route(method, path);
        self.script()
            .sent
            .iter()
            .filter(|r| r.route() == wanted)
            .cloned()
            .collect()
    }

    fn take(&self, request: &ApiRequest) -> Reply {
        let mut script = self.script();
        script.sent.push(request.clone());
        let key = request.route();
        if let Some(reply) = script.queued.get_mut(&key).and_then(VecDeque::pop_front) {
            return reply;
        }
        match script.fallback.get(&key) {
            Some(reply) => Reply::Ready(reply.clone()),
            None => Reply::Ready(Err(CallError::Transport(format!(
                "no scripted reply for {key}"
            )))),
        }
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: ApiRequest) -> impl Future<Output = CallResult<Value>> + Send {
        let reply = self.take(&request);
        async move {
            match reply {
                Reply::Ready(result) => result,
                Reply::Gated(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(CallError::Transport("gate dropped".to_string()))),
            }
        }
    }
}
