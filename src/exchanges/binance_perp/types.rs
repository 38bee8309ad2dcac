use crate::core::types::OrderSide;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One element of `GET /fapi/v2/balance`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinancePerpBalance {
    #[serde(default)]
    pub account_alias: Option<String>,
    pub asset: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub balance: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub available_balance: Decimal,
    #[serde(default)]
    pub cross_wallet_balance: Option<String>,
    #[serde(default)]
    pub cross_un_pnl: Option<String>,
    #[serde(default)]
    pub max_withdraw_amount: Option<String>,
    #[serde(default)]
    pub margin_available: Option<bool>,
    #[serde(default)]
    pub update_time: Option<i64>,
}

/// Order as returned by `POST`, `GET` and `DELETE /fapi/v1/order`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinancePerpOrderResponse {
    pub order_id: u64,
    pub client_order_id: String,
    pub symbol: String,
    pub status: String,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub orig_qty: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub executed_qty: Decimal,
    #[serde(default)]
    pub avg_price: Option<String>,
    #[serde(default)]
    pub time_in_force: Option<String>,
    #[serde(default)]
    pub reduce_only: bool,
    #[serde(default)]
    pub position_side: Option<String>,
    pub update_time: i64,
}
