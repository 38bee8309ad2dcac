use crate::core::errors::{ExchangeError, TransportKind};
use crate::core::kernel::request::{HttpMethod, SignedRequest};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use tracing::{instrument, trace};

/// `X-MBX-APIKEY`; header names are matched case-insensitively.
pub const API_KEY_HEADER: &str = "x-mbx-apikey";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Status and body bytes of a response, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Body as text, replacing invalid UTF-8. For logs and audit only.
    pub fn body_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body as exact text; bytes that are not UTF-8 are a decode failure.
    pub fn into_text(self) -> Result<String, ExchangeError> {
        String::from_utf8(self.body).map_err(|e| {
            let lossy = String::from_utf8_lossy(e.as_bytes()).into_owned();
            ExchangeError::decode(format!("Response body is not valid UTF-8: {}", e), lossy)
        })
    }
}

/// Moves a signed request over the wire.
///
/// Implementations only report transport failures; any HTTP response,
/// whatever its status, comes back as `Ok`.
#[async_trait]
pub trait RestClient: Send + Sync {
    async fn send(&self, request: &SignedRequest) -> Result<RawResponse, ExchangeError>;
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    /// Upper bound on a whole call, connect through body
    pub timeout: Duration,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    pub fn new(exchange_name: String) -> Self {
        Self {
            exchange_name,
            timeout: Duration::from_secs(10),
            user_agent: concat!("fapi-trader/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
    api_key: Option<Secret<String>>,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            config,
            api_key: None,
        }
    }

    /// API key sent as a header on every request.
    pub fn with_api_key(mut self, api_key: Secret<String>) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));

        let api_key = self.api_key.ok_or_else(|| {
            ExchangeError::Configuration("API key is required for signed requests".to_string())
        })?;
        if api_key.expose_secret().is_empty() {
            return Err(ExchangeError::Configuration(
                "API key is required for signed requests".to_string(),
            ));
        }
        let mut key_value = HeaderValue::from_str(api_key.expose_secret()).map_err(|e| {
            ExchangeError::Configuration(format!("API key is not a valid header value: {}", e))
        })?;
        key_value.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key_value);

        let client = Client::builder()
            .timeout(self.config.timeout)
            .user_agent(&self.config.user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                ExchangeError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
        })
    }
}

/// Implementation of `RestClient` using reqwest. Clones share one connection pool.
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

const fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn transport_error(err: reqwest::Error) -> ExchangeError {
    let kind = if err.is_timeout() {
        TransportKind::Timeout
    } else if err.is_connect() {
        TransportKind::Connect
    } else {
        TransportKind::Other
    };
    ExchangeError::transport(kind, err.without_url().to_string())
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(skip(self, request), fields(exchange = %self.config.exchange_name, method = %request.method, path = %request.path))]
    async fn send(&self, request: &SignedRequest) -> Result<RawResponse, ExchangeError> {
        // The query is already encoded and signed; it must go out byte for byte.
        let response = self
            .client
            .request(to_reqwest_method(request.method), &request.url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?.to_vec();

        trace!(status, body_len = body.len(), "Response received");

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_text_keeps_utf8_exact() {
        let raw = RawResponse {
            status: 200,
            body: "{\"asset\":\"USDⓈ\"}".as_bytes().to_vec(),
        };
        assert_eq!(raw.into_text().unwrap(), "{\"asset\":\"USDⓈ\"}");
    }

    #[test]
    fn test_into_text_rejects_invalid_utf8() {
        let raw = RawResponse {
            status: 400,
            body: vec![b'{', 0xff, 0xfe, b'}'],
        };
        assert_eq!(raw.body_lossy(), "{\u{fffd}\u{fffd}}");
        match raw.into_text().unwrap_err() {
            ExchangeError::Decode { body, .. } => assert_eq!(body, "{\u{fffd}\u{fffd}}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_build_requires_api_key() {
        let config = RestClientConfig::new("binance_perp".to_string());
        let err = RestClientBuilder::new(config).build().unwrap_err();
        assert!(matches!(err, ExchangeError::Configuration(_)));
    }

    #[test]
    fn test_build_rejects_empty_api_key() {
        let config = RestClientConfig::new("binance_perp".to_string());
        let err = RestClientBuilder::new(config)
            .with_api_key(Secret::new(String::new()))
            .build()
            .unwrap_err();
        assert!(matches!(err, ExchangeError::Configuration(_)));
    }

    #[test]
    fn test_build_rejects_header_unsafe_api_key() {
        let config = RestClientConfig::new("binance_perp".to_string());
        let result = RestClientBuilder::new(config)
            .with_api_key(Secret::new("bad\nkey".to_string()))
            .build();
        assert!(matches!(result, Err(ExchangeError::Configuration(_))));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = RestClientConfig::new("binance_perp".to_string())
            .with_timeout(Duration::from_millis(250));
        let rest = RestClientBuilder::new(config)
            .with_api_key(Secret::new("visible-key".to_string()))
            .build()
            .unwrap();
        let debug = format!("{:?}", rest);
        assert!(!debug.contains("visible-key"));
        assert!(debug.contains("250ms"));
    }
}
