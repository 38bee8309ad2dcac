use crate::core::audit::{AuditEntry, AuditOutcome, AuditSink};
use crate::core::errors::ExchangeError;
use crate::core::kernel::request::SignedRequest;
use crate::core::kernel::rest::{RawResponse, RestClient};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{error, instrument, warn};

/// Statuses treated as success. Other 2xx codes are rejections.
pub const SUCCESS_STATUSES: [u16; 2] = [200, 201];

/// Sends signed requests and sorts the outcome into transport failure,
/// exchange rejection, decode failure or a typed payload.
///
/// Never retries; whether a call is safe to repeat is the caller's call.
pub struct RequestExecutor<R: RestClient> {
    rest: R,
    audit: Arc<dyn AuditSink>,
}

impl<R: RestClient> std::fmt::Debug for RequestExecutor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor").finish_non_exhaustive()
    }
}

impl<R: RestClient> RequestExecutor<R> {
    pub fn new(rest: R, audit: Arc<dyn AuditSink>) -> Self {
        Self { rest, audit }
    }

    pub fn rest(&self) -> &R {
        &self.rest
    }

    /// Execute and decode a success body into `T`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: &SignedRequest,
    ) -> Result<T, ExchangeError> {
        let body = self.execute_raw(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            error!(
                method = %request.method,
                path = %request.path,
                body = %body,
                "Response did not match expected shape: {}", e
            );
            ExchangeError::decode(format!("Failed to parse JSON response: {}", e), body)
        })
    }

    /// Execute and return the success body as text, undecoded. Non-success
    /// statuses still become [`ExchangeError::Exchange`] with the body passed
    /// through verbatim; a body that is not UTF-8 is a decode failure.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute_raw(&self, request: &SignedRequest) -> Result<String, ExchangeError> {
        let outcome = self.rest.send(request).await;
        self.audit.record(audit_entry(request, &outcome));

        let raw = outcome.inspect_err(|e| warn!("HTTP request failed: {}", e))?;
        let status = raw.status;
        let body = raw.into_text().inspect_err(|e| warn!(status, "{}", e))?;

        if SUCCESS_STATUSES.contains(&status) {
            Ok(body)
        } else {
            warn!(status, body = %body, "Non-success status code");
            Err(ExchangeError::Exchange {
                status,
                body,
                operation: None,
            })
        }
    }
}

fn audit_entry(request: &SignedRequest, outcome: &Result<RawResponse, ExchangeError>) -> AuditEntry {
    let outcome = match outcome {
        Ok(raw) => AuditOutcome::Response {
            status: raw.status,
            body: raw.body_lossy(),
        },
        Err(ExchangeError::Transport { kind, message }) => AuditOutcome::TransportFailure {
            kind: *kind,
            message: message.clone(),
        },
        Err(other) => AuditOutcome::TransportFailure {
            kind: crate::core::errors::TransportKind::Other,
            message: other.to_string(),
        },
    };

    AuditEntry {
        method: request.method,
        url: request.url.clone(),
        params: request.params.clone(),
        outcome,
    }
}
