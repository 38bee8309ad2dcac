use crate::core::kernel::QueryParams;
use crate::core::types::{BalanceEntry, OrderAck, OrderRef, OrderRequest, Price, Quantity};
use crate::exchanges::binance_perp::types::{BinancePerpBalance, BinancePerpOrderResponse};

/// Convert Binance Perpetual balance to core `BalanceEntry`
pub fn convert_binance_perp_balance(balance: BinancePerpBalance) -> BalanceEntry {
    BalanceEntry {
        asset: balance.asset,
        total: Quantity::new(balance.balance),
        available: Quantity::new(balance.available_balance),
    }
}

/// Convert Binance Perpetual order response to core `OrderAck`
pub fn convert_binance_perp_order(order: BinancePerpOrderResponse) -> OrderAck {
    OrderAck {
        order_id: order.order_id,
        client_order_id: order.client_order_id,
        symbol: order.symbol,
        status: order.status,
        side: order.side,
        order_type: order.order_type,
        quantity: Quantity::new(order.orig_qty),
        price: Price::new(order.price),
        executed_quantity: Quantity::new(order.executed_qty),
        time_in_force: order.time_in_force,
        reduce_only: order.reduce_only,
        update_time: order.update_time,
    }
}

/// Wire parameters for a new order. Assumes the request was validated.
pub fn order_request_to_params(order: &OrderRequest) -> QueryParams {
    let mut params = QueryParams::new();
    params
        .insert("symbol", order.symbol.as_str())
        .insert("side", order.side.as_str())
        .insert("type", order.order_type.as_str())
        .insert("quantity", order.quantity.to_string())
        .insert("reduceOnly", order.reduce_only.to_string());

    if let Some(price) = order.price {
        params.insert("price", price.to_string());
    }
    if let Some(tif) = order.time_in_force {
        params.insert("timeInForce", tif.as_str());
    }
    if let Some(id) = &order.client_order_id {
        params.insert("newClientOrderId", id.as_str());
    }

    params
}

/// Wire parameters that identify an existing order.
pub fn order_ref_to_params(symbol: &str, order: &OrderRef) -> QueryParams {
    let params = QueryParams::new().with("symbol", symbol);
    match order {
        OrderRef::OrderId(id) => params.with("orderId", id.to_string()),
        OrderRef::ClientOrderId(id) => params.with("origClientOrderId", id.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{OrderSide, TimeInForce};
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_market_params() {
        let order = OrderRequest::market("btcusdt", OrderSide::Buy, dec("0.010"));
        let params = order_request_to_params(&order);

        assert_eq!(
            params.encode(),
            "quantity=0.01&reduceOnly=false&side=BUY&symbol=BTCUSDT&type=MARKET"
        );
        assert_eq!(params.get("price"), None);
        assert_eq!(params.get("timeInForce"), None);
    }

    #[test]
    fn test_limit_params_with_options() {
        let order = OrderRequest::limit("ETHUSDT", OrderSide::Sell, dec("2"), dec("2500.50"))
            .with_time_in_force(TimeInForce::IOC)
            .with_reduce_only(true)
            .with_client_order_id("my-order-1");
        let params = order_request_to_params(&order);

        assert_eq!(params.get("type"), Some("LIMIT"));
        assert_eq!(params.get("price"), Some("2500.5"));
        assert_eq!(params.get("timeInForce"), Some("IOC"));
        assert_eq!(params.get("reduceOnly"), Some("true"));
        assert_eq!(params.get("newClientOrderId"), Some("my-order-1"));
    }

    #[test]
    fn test_order_ref_params() {
        assert_eq!(
            order_ref_to_params("BTCUSDT", &OrderRef::OrderId(42)).encode(),
            "orderId=42&symbol=BTCUSDT"
        );
        assert_eq!(
            order_ref_to_params("BTCUSDT", &OrderRef::ClientOrderId("abc".into())).encode(),
            "origClientOrderId=abc&symbol=BTCUSDT"
        );
    }

    #[test]
    fn test_balance_conversion_keeps_values() {
        let entry = convert_binance_perp_balance(BinancePerpBalance {
            account_alias: None,
            asset: "USDT".to_string(),
            balance: dec("100.5"),
            available_balance: dec("90"),
            cross_wallet_balance: None,
            cross_un_pnl: None,
            max_withdraw_amount: None,
            margin_available: None,
            update_time: None,
        });
        assert_eq!(entry.asset, "USDT");
        assert_eq!(entry.total.value(), dec("100.5"));
        assert_eq!(entry.available.value(), dec("90"));
    }
}
