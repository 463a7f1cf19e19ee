//! Scripted transport shared by unit tests.

use crate::http::{HttpResponse, PendingRequest, RequestBody, Transport, TransportError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub target: String,
    pub content_type: Option<String>,
    pub body: RequestBody,
}

/// Replies are queued per target and consumed in order. An unscripted target gets a
/// 404 so a test fails loudly on its assertions rather than hanging.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Result<HttpResponse, TransportError>>>>,
    calls: Mutex<Vec<RecordedCall>>,
    renewals: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, target: &str, reply: Result<HttpResponse, TransportError>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(target.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn reply(self, target: &str, status: u16, body: Value) -> Self {
        self.push(target, Ok(HttpResponse::with_json(status, &body)))
    }

    pub fn reply_status(self, target: &str, status: u16) -> Self {
        self.push(target, Ok(HttpResponse::empty(status)))
    }

    pub fn fail(self, target: &str) -> Self {
        self.push(
            target,
            Err(TransportError::Network("connection refused".to_string())),
        )
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, target: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.target == target)
            .count()
    }

    pub fn renewals(&self) -> usize {
        self.renewals.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &PendingRequest) -> Result<HttpResponse, TransportError> {
        // Suspension point so concurrent callers interleave like real I/O.
        tokio::task::yield_now().await;

        self.calls.lock().unwrap().push(RecordedCall {
            method: request.method().clone(),
            target: request.target().to_string(),
            content_type: request
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body: request.body().clone(),
        });

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(request.target())
            .and_then(VecDeque::pop_front);
        reply.unwrap_or_else(|| {
            Ok(HttpResponse::with_json(
                404,
                &serde_json::json!({"detail": format!("unscripted {}", request.target())}),
            ))
        })
    }

    async fn session_renewed(&self, _refresh: &HttpResponse) {
        self.renewals.fetch_add(1, Ordering::SeqCst);
    }
}
