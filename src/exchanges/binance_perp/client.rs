use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClient};
use crate::core::types::{
    normalize_symbol, validate_client_order_id, BalanceEntry, OrderAck, OrderRef, OrderRequest,
    OrderSide, TimeInForce,
};
use crate::exchanges::binance_perp::conversions::{
    convert_binance_perp_balance, convert_binance_perp_order, order_ref_to_params,
    order_request_to_params,
};
use crate::exchanges::binance_perp::rest::BinancePerpRestClient;
use crate::utils::retry::retry_transport;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{info, instrument};

/// Signed trading operations against the USDⓈ-M futures API.
///
/// Holds configuration and a connection pool only; there is no order
/// history or other state to corrupt, so calls may run concurrently and be
/// cancelled at any point. Only [`Self::get_balance_with_retry`] retries.
pub struct TradingClient<R: RestClient = ReqwestRest> {
    rest: BinancePerpRestClient<R>,
}

impl<R: RestClient> std::fmt::Debug for TradingClient<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradingClient")
            .field("rest", &self.rest)
            .finish()
    }
}

impl<R: RestClient> TradingClient<R> {
    pub fn new(rest: BinancePerpRestClient<R>) -> Self {
        Self { rest }
    }

    /// Account balances, in the order the exchange lists them.
    #[instrument(skip(self), fields(exchange = "binance_perp"))]
    pub async fn get_balance(&self) -> Result<Vec<BalanceEntry>, ExchangeError> {
        info!("Querying account balance");
        let balances = self
            .rest
            .get_balance()
            .await
            .map_err(|e| e.with_operation("get_balance"))?;
        Ok(balances
            .into_iter()
            .map(convert_binance_perp_balance)
            .collect())
    }

    /// [`Self::get_balance`], retrying transport failures with the given
    /// delays. Safe because the balance query is read-only.
    #[instrument(skip(self, strategy), fields(exchange = "binance_perp"))]
    pub async fn get_balance_with_retry<S>(
        &self,
        strategy: S,
    ) -> Result<Vec<BalanceEntry>, ExchangeError>
    where
        S: IntoIterator<Item = Duration>,
    {
        retry_transport(strategy, || self.get_balance()).await
    }

    /// MARKET order. `symbol` and `side` are case-insensitive.
    ///
    /// Sends no `newClientOrderId`; build an [`OrderRequest`] with
    /// `with_client_order_id` and use [`Self::place_order`] to set one.
    #[instrument(skip(self), fields(exchange = "binance_perp"))]
    pub async fn place_market_order(
        &self,
        symbol: &str,
        side: &str,
        quantity: Decimal,
        reduce_only: bool,
    ) -> Result<OrderAck, ExchangeError> {
        let side: OrderSide = side.parse()?;
        let order = OrderRequest::market(symbol, side, quantity).with_reduce_only(reduce_only);
        self.submit(&order, "place_market_order").await
    }

    /// LIMIT order. `time_in_force` defaults to GTC.
    ///
    /// Like [`Self::place_market_order`], takes no client order id; use
    /// [`Self::place_order`] for that.
    #[instrument(skip(self), fields(exchange = "binance_perp"))]
    pub async fn place_limit_order(
        &self,
        symbol: &str,
        side: &str,
        quantity: Decimal,
        price: Decimal,
        time_in_force: Option<TimeInForce>,
        reduce_only: bool,
    ) -> Result<OrderAck, ExchangeError> {
        let side: OrderSide = side.parse()?;
        let order = OrderRequest::limit(symbol, side, quantity, price)
            .with_time_in_force(time_in_force.unwrap_or_default())
            .with_reduce_only(reduce_only);
        self.submit(&order, "place_limit_order").await
    }

    /// Place a fully described order.
    ///
    /// Not safe to resend blindly after a transport error: set a
    /// `client_order_id` and use [`Self::query_order`] to learn whether the
    /// first attempt landed.
    #[instrument(skip(self, order), fields(exchange = "binance_perp", symbol = %order.symbol, side = %order.side, order_type = %order.order_type))]
    pub async fn place_order(&self, order: &OrderRequest) -> Result<OrderAck, ExchangeError> {
        self.submit(order, "place_order").await
    }

    #[instrument(skip(self), fields(exchange = "binance_perp"))]
    pub async fn query_order(
        &self,
        symbol: &str,
        order: OrderRef,
    ) -> Result<OrderAck, ExchangeError> {
        let params = order_ref_params(symbol, &order)?;
        let response = self
            .rest
            .query_order(&params)
            .await
            .map_err(|e| e.with_operation("query_order"))?;
        Ok(convert_binance_perp_order(response))
    }

    #[instrument(skip(self), fields(exchange = "binance_perp"))]
    pub async fn cancel_order(
        &self,
        symbol: &str,
        order: OrderRef,
    ) -> Result<OrderAck, ExchangeError> {
        let params = order_ref_params(symbol, &order)?;
        info!(symbol = params.get("symbol"), ?order, "Cancelling order");
        let response = self
            .rest
            .cancel_order(&params)
            .await
            .map_err(|e| e.with_operation("cancel_order"))?;
        Ok(convert_binance_perp_order(response))
    }

    async fn submit(
        &self,
        order: &OrderRequest,
        operation: &'static str,
    ) -> Result<OrderAck, ExchangeError> {
        // Validation happens before anything is signed or sent.
        order.validate()?;

        match order.price {
            Some(price) => info!(
                "Placing {} order: {} {} {} @ {}",
                order.order_type, order.side, order.quantity, order.symbol, price
            ),
            None => info!(
                "Placing {} order: {} {} {}",
                order.order_type, order.side, order.quantity, order.symbol
            ),
        }

        let params = order_request_to_params(order);
        let response = self
            .rest
            .new_order(&params)
            .await
            .map_err(|e| e.with_operation(operation))?;
        Ok(convert_binance_perp_order(response))
    }
}

fn order_ref_params(
    symbol: &str,
    order: &OrderRef,
) -> Result<crate::core::kernel::QueryParams, ExchangeError> {
    let symbol = normalize_symbol(symbol);
    if symbol.is_empty() {
        return Err(ExchangeError::validation("symbol must not be empty"));
    }
    if let OrderRef::ClientOrderId(id) = order {
        validate_client_order_id(id)?;
    }
    Ok(order_ref_to_params(&symbol, order))
}
