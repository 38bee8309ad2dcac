use crate::core::errors::ExchangeError;
use crate::core::kernel::clock::{Clock, SystemClock};
use crate::core::kernel::signer::Signer;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;
use url::form_urlencoded;

/// Parameters the builder injects; caller values under these names are dropped.
pub const RESERVED_PARAMS: [&str; 3] = ["timestamp", "recvWindow", "signature"];

/// Verbs a signed call may use. Anything else cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller parameters with unique keys, always serialized in ascending key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Form-urlencoded, keys ascending.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

/// A fully formed, single-use signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub method: HttpMethod,
    pub path: String,
    /// Base URL + path + `?` + query.
    pub url: String,
    /// Canonical query string, `signature` last.
    pub query: String,
    /// Every signed parameter in wire order, `signature` excluded.
    pub params: Vec<(String, String)>,
    pub timestamp: u64,
    pub signature: String,
}

/// Turns `(method, path, params)` into a [`SignedRequest`].
///
/// Holds no per-call state, so one builder can serve concurrent callers.
pub struct RequestBuilder {
    base_url: String,
    recv_window_ms: u64,
    clock: Arc<dyn Clock>,
    signer: Arc<dyn Signer>,
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("base_url", &self.base_url)
            .field("recv_window_ms", &self.recv_window_ms)
            .finish_non_exhaustive()
    }
}

impl RequestBuilder {
    pub fn new(base_url: impl Into<String>, recv_window_ms: u64, signer: Arc<dyn Signer>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            recv_window_ms,
            clock: Arc::new(SystemClock),
            signer,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Caller params (ascending key order, reserved names dropped), then
    /// `timestamp`, `recvWindow`, then `signature` over everything before it.
    /// `params` is only read.
    pub fn build(
        &self,
        method: HttpMethod,
        path: &str,
        params: &QueryParams,
    ) -> Result<SignedRequest, ExchangeError> {
        let timestamp = self.clock.now_ms();

        let mut signed_params: Vec<(String, String)> = params
            .iter()
            .filter(|(k, _)| !RESERVED_PARAMS.contains(k))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        signed_params.push(("timestamp".to_string(), timestamp.to_string()));
        signed_params.push(("recvWindow".to_string(), self.recv_window_ms.to_string()));

        let payload = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(signed_params.iter())
            .finish();
        let signature = self.signer.sign(&payload)?;
        let query = format!("{}&signature={}", payload, signature);
        let url = format!("{}{}?{}", self.base_url, path, query);

        trace!(method = %method, path, param_count = signed_params.len(), "built signed request");

        Ok(SignedRequest {
            method,
            path: path.to_string(),
            url,
            query,
            params: signed_params,
            timestamp,
            signature,
        })
    }
}
