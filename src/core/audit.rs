//! Per-request audit trail.
//!
//! Every call that reaches the transport produces exactly one [`AuditEntry`],
//! whatever its outcome. Sinks are notification-only and must not block.

use crate::core::errors::TransportKind;
use crate::core::kernel::executor::SUCCESS_STATUSES;
use crate::core::kernel::request::HttpMethod;
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub const AUDIT_TARGET: &str = "fapi_trader::requests";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    Response { status: u16, body: String },
    TransportFailure { kind: TransportKind, message: String },
}

/// One executed request. Holds nothing derived from the API secret other
/// than the single-use signature inside `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub method: HttpMethod,
    pub url: String,
    /// Signed parameters without `signature`.
    pub params: Vec<(String, String)>,
    pub outcome: AuditOutcome,
}

impl AuditEntry {
    pub fn status(&self) -> Option<u16> {
        match &self.outcome {
            AuditOutcome::Response { status, .. } => Some(*status),
            AuditOutcome::TransportFailure { .. } => None,
        }
    }

    /// Same classification the executor applies to the response.
    pub fn is_success(&self) -> bool {
        self.status()
            .is_some_and(|status| SUCCESS_STATUSES.contains(&status))
    }

    pub fn body(&self) -> Option<&str> {
        match &self.outcome {
            AuditOutcome::Response { body, .. } => Some(body),
            AuditOutcome::TransportFailure { .. } => None,
        }
    }
}

pub trait AuditSink: Send + Sync {
    fn record(&self, entry: AuditEntry);
}

/// Writes each entry as a `tracing` event on [`AUDIT_TARGET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, entry: AuditEntry) {
        match &entry.outcome {
            AuditOutcome::Response { status, body } if SUCCESS_STATUSES.contains(status) => {
                debug!(target: AUDIT_TARGET, method = %entry.method, url = %entry.url, params = ?entry.params, status, body = %body, "request completed");
            }
            AuditOutcome::Response { status, body } => {
                warn!(target: AUDIT_TARGET, method = %entry.method, url = %entry.url, params = ?entry.params, status, body = %body, "request rejected");
            }
            AuditOutcome::TransportFailure { kind, message } => {
                warn!(target: AUDIT_TARGET, method = %entry.method, url = %entry.url, params = ?entry.params, %kind, error = %message, "request failed in transport");
            }
        }
    }
}

/// Forwards entries to an unbounded channel for a consumer task to persist.
#[derive(Debug, Clone)]
pub struct ChannelAuditSink {
    tx: mpsc::UnboundedSender<AuditEntry>,
}

impl ChannelAuditSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AuditEntry>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl AuditSink for ChannelAuditSink {
    fn record(&self, entry: AuditEntry) {
        // A dropped receiver only means nobody is listening anymore.
        if self.tx.send(entry).is_err() {
            debug!(target: AUDIT_TARGET, "audit receiver dropped; entry discarded");
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _entry: AuditEntry) {}
}
