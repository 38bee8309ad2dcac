use crate::core::errors::ExchangeError;
use crate::core::kernel::{HttpMethod, QueryParams, RequestBuilder, RequestExecutor, RestClient};
use crate::exchanges::binance_perp::types::{BinancePerpBalance, BinancePerpOrderResponse};
use serde::de::DeserializeOwned;
use tracing::instrument;

pub const BALANCE_PATH: &str = "/fapi/v2/balance";
pub const ORDER_PATH: &str = "/fapi/v1/order";

/// Signed REST endpoints for Binance Perpetual
pub struct BinancePerpRestClient<R: RestClient> {
    builder: RequestBuilder,
    executor: RequestExecutor<R>,
}

impl<R: RestClient> std::fmt::Debug for BinancePerpRestClient<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinancePerpRestClient")
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}

impl<R: RestClient> BinancePerpRestClient<R> {
    pub fn new(builder: RequestBuilder, executor: RequestExecutor<R>) -> Self {
        Self { builder, executor }
    }

    async fn signed<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        params: &QueryParams,
    ) -> Result<T, ExchangeError> {
        let request = self.builder.build(method, path, params)?;
        self.executor.execute(&request).await
    }

    /// Get account balance (authenticated)
    #[instrument(skip(self), fields(exchange = "binance_perp"))]
    pub async fn get_balance(&self) -> Result<Vec<BinancePerpBalance>, ExchangeError> {
        self.signed(HttpMethod::Get, BALANCE_PATH, &QueryParams::new())
            .await
    }

    /// Place a new order (authenticated)
    #[instrument(skip(self, params), fields(exchange = "binance_perp", symbol = params.get("symbol")))]
    pub async fn new_order(
        &self,
        params: &QueryParams,
    ) -> Result<BinancePerpOrderResponse, ExchangeError> {
        self.signed(HttpMethod::Post, ORDER_PATH, params).await
    }

    /// Query an order (authenticated)
    #[instrument(skip(self, params), fields(exchange = "binance_perp", symbol = params.get("symbol")))]
    pub async fn query_order(
        &self,
        params: &QueryParams,
    ) -> Result<BinancePerpOrderResponse, ExchangeError> {
        self.signed(HttpMethod::Get, ORDER_PATH, params).await
    }

    /// Cancel an order (authenticated)
    #[instrument(skip(self, params), fields(exchange = "binance_perp", symbol = params.get("symbol")))]
    pub async fn cancel_order(
        &self,
        params: &QueryParams,
    ) -> Result<BinancePerpOrderResponse, ExchangeError> {
        self.signed(HttpMethod::Delete, ORDER_PATH, params).await
    }
}
