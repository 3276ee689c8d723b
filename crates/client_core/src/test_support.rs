use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use shared::protocol::Endpoint;
use tokio::sync::oneshot;

use crate::{
    copy::ClipboardSink,
    gateway::{GatewayError, RequestGateway},
};

struct Scripted {
    result: Result<Value, GatewayError>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Gateway that replays queued responses in order and records every call.
pub(crate) struct ScriptedGateway {
    responses: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<(Endpoint, Value)>>,
}

impl ScriptedGateway {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn push_ok(&self, body: Value) {
        self.push(Ok(body), None);
    }

    pub(crate) fn push_err(&self, err: GatewayError) {
        self.push(Err(err), None);
    }

    /// Queues a response that is held back until the returned sender fires.
    pub(crate) fn push_gated(&self, result: Result<Value, GatewayError>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(result, Some(rx));
        tx
    }

    fn push(&self, result: Result<Value, GatewayError>, gate: Option<oneshot::Receiver<()>>) {
        self.responses
            .lock()
            .expect("responses lock")
            .push_back(Scripted { result, gate });
    }

    pub(crate) fn calls(&self) -> Vec<(Endpoint, Value)> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub(crate) async fn wait_for_calls(&self, count: usize) {
        while self.calls.lock().expect("calls lock").len() < count {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl RequestGateway for ScriptedGateway {
    async fn invoke(&self, endpoint: &Endpoint, payload: Value) -> Result<Value, GatewayError> {
        let scripted = self.responses.lock().expect("responses lock").pop_front();
        self.calls
            .lock()
            .expect("calls lock")
            .push((endpoint.clone(), payload));
        let Some(scripted) = scripted else {
            return Err(GatewayError::Transport {
                endpoint: endpoint.path(),
                reason: "no scripted response".to_string(),
            });
        };
        if let Some(gate) = scripted.gate {
            let _ = gate.await;
        }
        scripted.result
    }
}

pub(crate) fn application_error(endpoint: &Endpoint, status: u16, message: &str) -> GatewayError {
    GatewayError::Application {
        endpoint: endpoint.path(),
        status,
        message: message.to_string(),
    }
}

pub(crate) fn transport_error(endpoint: &Endpoint) -> GatewayError {
    GatewayError::Transport {
        endpoint: endpoint.path(),
        reason: "connection refused".to_string(),
    }
}

#[derive(Default)]
pub(crate) struct MemoryClipboard {
    pub(crate) writes: Mutex<Vec<String>>,
    pub(crate) fail: bool,
}

impl MemoryClipboard {
    pub(crate) fn failing() -> Self {
        Self {
            writes: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub(crate) fn last(&self) -> Option<String> {
        self.writes.lock().expect("writes lock").last().cloned()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        if self.fail {
            return Err(anyhow!("clipboard unavailable"));
        }
        self.writes
            .lock()
            .expect("writes lock")
            .push(text.to_string());
        Ok(())
    }
}
