//! Scripted in-memory transport for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::Value;

use crate::error::TransportError;
use crate::transport::{ProxyRequest, ProxyResponse, Transport};

/// Replays queued responses in order and records every request it sees.
/// Running out of responses is a network error.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<ProxyResponse, TransportError>>>,
    seen: RefCell<Vec<ProxyRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, status: u16, body: &Value) {
        self.respond_raw(status, &body.to_string());
    }

    pub(crate) fn respond_raw(&self, status: u16, body: &str) {
        self.replies.borrow_mut().push_back(Ok(ProxyResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub(crate) fn fail(&self, err: TransportError) {
        self.replies.borrow_mut().push_back(Err(err));
    }

    pub(crate) fn requests(&self) -> Vec<ProxyRequest> {
        self.seen.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &ProxyRequest) -> Result<ProxyResponse, TransportError> {
        self.seen.borrow_mut().push(request.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted reply".into())))
    }
}
