use serde::Deserialize;
use thiserror::Error;

/// What went wrong below the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Timeout,
    Connect,
    Other,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => f.write_str("timeout"),
            Self::Connect => f.write_str("connect"),
            Self::Other => f.write_str("other"),
        }
    }
}

/// Every failure a trading call can produce.
///
/// The variants are kept apart so a caller can pick a policy per kind:
/// a `Transport` failure leaves the remote outcome unknown, an `Exchange`
/// error is the exchange's final answer, `Validation` never left the process.
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Invalid parameters: {0}")]
    Validation(String),

    #[error("Transport failure ({kind}): {message}")]
    Transport { kind: TransportKind, message: String },

    #[error("API error: {status} - {body}")]
    Exchange {
        status: u16,
        body: String,
        operation: Option<&'static str>,
    },

    #[error("Failed to decode response: {message}")]
    Decode { message: String, body: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Error payload the exchange puts in a rejected response.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ExchangeErrorBody {
    pub code: i64,
    pub msg: String,
}

impl ExchangeError {
    #[cold]
    #[inline(never)]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    #[cold]
    #[inline(never)]
    pub fn transport(kind: TransportKind, message: impl Into<String>) -> Self {
        Self::Transport {
            kind,
            message: message.into(),
        }
    }

    #[cold]
    #[inline(never)]
    pub fn decode(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            body: body.into(),
        }
    }

    /// Tag an exchange rejection with the operation that triggered it.
    /// Other kinds pass through untouched.
    pub fn with_operation(self, name: &'static str) -> Self {
        match self {
            Self::Exchange { status, body, .. } => Self::Exchange {
                status,
                body,
                operation: Some(name),
            },
            other => other,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Only transport failures are worth retrying, and only for idempotent calls.
    pub fn is_retryable(&self) -> bool {
        self.is_transport()
    }

    /// HTTP status of an exchange rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Exchange { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parses the exchange's `{"code":..,"msg":..}` body, if there is one.
    pub fn exchange_body(&self) -> Option<ExchangeErrorBody> {
        match self {
            Self::Exchange { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }

    pub fn exchange_code(&self) -> Option<i64> {
        self.exchange_body().map(|b| b.code)
    }
}

impl From<crate::core::config::ConfigError> for ExchangeError {
    fn from(err: crate::core::config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
