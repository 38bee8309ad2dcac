//! Exchange-agnostic signing and transport.
//!
//! A private call flows through four pieces, leaves first:
//!
//! - [`Clock`]: millisecond timestamps (`SystemClock`, `ManualClock`)
//! - [`Signer`]: HMAC-SHA256 over the canonical query (`HmacSigner`)
//! - [`RequestBuilder`]: canonical query + `timestamp` + `recvWindow` + `signature`
//! - [`RequestExecutor`]: sends through a [`RestClient`], classifies the
//!   outcome, decodes the payload and reports to the audit sink
//!
//! ```rust,no_run
//! use fapi_trader::core::audit::TracingAuditSink;
//! use fapi_trader::core::kernel::*;
//! use secrecy::Secret;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), fapi_trader::ExchangeError> {
//! let signer = Arc::new(HmacSigner::new(Secret::new("secret".to_string()))?);
//! let builder = RequestBuilder::new("https://testnet.binancefuture.com", 5000, signer);
//! let rest = RestClientBuilder::new(RestClientConfig::new("binance_perp".to_string()))
//!     .with_api_key(Secret::new("key".to_string()))
//!     .build()?;
//! let executor = RequestExecutor::new(rest, Arc::new(TracingAuditSink));
//!
//! let request = builder.build(HttpMethod::Get, "/fapi/v2/balance", &QueryParams::new())?;
//! let balances: serde_json::Value = executor.execute(&request).await?;
//! # Ok(())
//! # }
//! ```
pub mod clock;
pub mod executor;
pub mod request;
pub mod rest;
pub mod signer;

#[cfg(test)]
pub(crate) mod mock;

// Re-export key types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use executor::{RequestExecutor, SUCCESS_STATUSES};
pub use request::{HttpMethod, QueryParams, RequestBuilder, SignedRequest};
pub use rest::{RawResponse, ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use signer::{sign_hmac_sha256, HmacSigner, Signer};
