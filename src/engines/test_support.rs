use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::error::EngineError;
use crate::core::traits::TranslationEngine;
use crate::core::types::EngineId;
use crate::transport::http::{HttpClient, HttpRequest, HttpResponse, TransportError};

/// Scripted [`HttpClient`] that records every request it receives.
#[derive(Clone, Default)]
pub(crate) struct RecordingHttpClient {
    replies: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl RecordingHttpClient {
    pub(crate) fn replying(replies: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn ok(status_code: u16, body: &str) -> Self {
        Self::replying(vec![Ok(HttpResponse {
            status_code,
            body: body.to_string(),
        })])
    }

    pub(crate) fn failing(error: TransportError) -> Self {
        Self::replying(vec![Err(error)])
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl HttpClient for RecordingHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().expect("requests lock").push(request);
        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Network {
                    message: "no scripted reply".to_string(),
                })
            })
    }
}

/// Engine with a fixed reply that counts invocations and records the texts
/// and targets it was asked for.
#[derive(Clone)]
pub(crate) struct ScriptedEngine {
    id: EngineId,
    reply: Result<String, EngineError>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl ScriptedEngine {
    pub(crate) fn succeeding(id: EngineId, text: &str) -> Self {
        Self {
            id,
            reply: Ok(text.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn failing(id: EngineId, error: EngineError) -> Self {
        Self {
            id,
            reply: Err(error),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    pub(crate) fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl TranslationEngine for ScriptedEngine {
    fn id(&self) -> EngineId {
        self.id
    }

    async fn translate(&self, text: &str, target_language: &str) -> Result<String, EngineError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((text.to_string(), target_language.to_string()));
        self.reply.clone()
    }
}
