use crate::core::audit::{AuditSink, TracingAuditSink};
use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{
    Clock, HmacSigner, ReqwestRest, RequestBuilder, RequestExecutor, RestClient,
    RestClientBuilder, RestClientConfig, SystemClock,
};
use crate::exchanges::binance_perp::client::TradingClient;
use crate::exchanges::binance_perp::rest::BinancePerpRestClient;
use std::sync::Arc;
use tracing::debug;

const EXCHANGE_NAME: &str = "binance_perp";

/// Fluent builder for a [`TradingClient`].
///
/// Defaults: audit through `tracing`, wall-clock timestamps.
pub struct BinancePerpBuilder {
    config: ExchangeConfig,
    audit: Arc<dyn AuditSink>,
    clock: Arc<dyn Clock>,
}

impl BinancePerpBuilder {
    pub fn new(config: ExchangeConfig) -> Self {
        Self {
            config,
            audit: Arc::new(TracingAuditSink),
            clock: Arc::new(SystemClock),
        }
    }

    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build a client backed by `reqwest`.
    pub fn build(self) -> Result<TradingClient<ReqwestRest>, ExchangeError> {
        self.config.validate()?;

        let rest_config = RestClientConfig::new(EXCHANGE_NAME.to_string())
            .with_timeout(self.config.timeout);
        let rest = RestClientBuilder::new(rest_config)
            .with_api_key(self.config.api_key.clone())
            .build()?;

        self.build_with_rest(rest)
    }

    /// Build a client over any transport. Credentials and the receive
    /// window are still checked, so a bad config fails here rather than on
    /// the first call.
    pub fn build_with_rest<R: RestClient>(self, rest: R) -> Result<TradingClient<R>, ExchangeError> {
        self.config.validate()?;

        let base_url = self.config.resolved_base_url();
        debug!(
            exchange = EXCHANGE_NAME,
            %base_url,
            recv_window_ms = self.config.recv_window_ms,
            "Building trading client"
        );

        let signer = Arc::new(HmacSigner::new(self.config.secret_key.clone())?);
        let builder = RequestBuilder::new(base_url, self.config.recv_window_ms, signer)
            .with_clock(self.clock);
        let executor = RequestExecutor::new(rest, self.audit);

        Ok(TradingClient::new(BinancePerpRestClient::new(
            builder, executor,
        )))
    }
}

/// Create a trading client with default audit and clock.
pub fn build_client(config: ExchangeConfig) -> Result<TradingClient<ReqwestRest>, ExchangeError> {
    BinancePerpBuilder::new(config).build()
}
