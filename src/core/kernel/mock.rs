//! Test doubles for the transport and audit seams.

use crate::core::audit::{AuditEntry, AuditSink};
use crate::core::errors::ExchangeError;
use crate::core::kernel::request::SignedRequest;
use crate::core::kernel::rest::{RawResponse, RestClient};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays scripted outcomes in order and records every request it sees.
/// Clones share the script and the call log.
#[derive(Clone, Default)]
pub struct MockRest {
    script: Arc<Mutex<VecDeque<Result<RawResponse, ExchangeError>>>>,
    calls: Arc<Mutex<Vec<SignedRequest>>>,
}

impl MockRest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, status: u16, body: &str) {
        self.push_bytes(status, body.as_bytes().to_vec());
    }

    pub fn push_bytes(&self, status: u16, body: Vec<u8>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(RawResponse { status, body }));
    }

    pub fn push_error(&self, err: ExchangeError) {
        self.script.lock().unwrap().push_back(Err(err));
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<SignedRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RestClient for MockRest {
    async fn send(&self, request: &SignedRequest) -> Result<RawResponse, ExchangeError> {
        self.calls.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted response for {}", request.path))
    }
}

#[derive(Default)]
pub struct MemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditSink {
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, entry: AuditEntry) {
        self.entries.lock().unwrap().push(entry);
    }
}
