use crate::core::errors::ExchangeError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe price representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::str")] pub Decimal);

impl Price {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// Type-safe quantity representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(#[serde(with = "rust_decimal::serde::str")] pub Decimal);

impl Quantity {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl FromStr for OrderSide {
    type Err = ExchangeError;

    /// Case-insensitive: `"buy"`, `"Buy"` and `"BUY"` are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            _ => Err(ExchangeError::validation(format!(
                "side must be BUY or SELL, got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Market,
    Limit,
}

impl OrderType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Market => "MARKET",
            Self::Limit => "LIMIT",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    #[default]
    GTC, // Good Till Canceled
    IOC, // Immediate or Cancel
    FOK, // Fill or Kill
}

impl TimeInForce {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GTC => "GTC",
            Self::IOC => "IOC",
            Self::FOK => "FOK",
        }
    }
}

impl FromStr for TimeInForce {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GTC" => Ok(Self::GTC),
            "IOC" => Ok(Self::IOC),
            "FOK" => Ok(Self::FOK),
            _ => Err(ExchangeError::validation(format!(
                "time in force must be GTC, IOC or FOK, got '{}'",
                s
            ))),
        }
    }
}

/// Longest client order id the exchange accepts.
pub const MAX_CLIENT_ORDER_ID_LEN: usize = 36;

/// An order as the caller describes it. Nothing here is checked until
/// [`OrderRequest::validate`] runs; the client always calls it before signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Quantity,
    pub price: Option<Price>,
    pub time_in_force: Option<TimeInForce>,
    pub reduce_only: bool,
    pub client_order_id: Option<String>,
}

impl OrderRequest {
    pub fn market(symbol: &str, side: OrderSide, quantity: Decimal) -> Self {
        Self {
            symbol: normalize_symbol(symbol),
            side,
            order_type: OrderType::Market,
            quantity: Quantity::new(quantity),
            price: None,
            time_in_force: None,
            reduce_only: false,
            client_order_id: None,
        }
    }

    pub fn limit(symbol: &str, side: OrderSide, quantity: Decimal, price: Decimal) -> Self {
        Self {
            symbol: normalize_symbol(symbol),
            side,
            order_type: OrderType::Limit,
            quantity: Quantity::new(quantity),
            price: Some(Price::new(price)),
            time_in_force: Some(TimeInForce::GTC),
            reduce_only: false,
            client_order_id: None,
        }
    }

    pub fn with_reduce_only(mut self, reduce_only: bool) -> Self {
        self.reduce_only = reduce_only;
        self
    }

    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = Some(time_in_force);
        self
    }

    pub fn with_client_order_id(mut self, client_order_id: impl Into<String>) -> Self {
        self.client_order_id = Some(client_order_id.into());
        self
    }

    /// Local preconditions. A failure here means nothing was sent.
    pub fn validate(&self) -> Result<(), ExchangeError> {
        if self.symbol.is_empty() {
            return Err(ExchangeError::validation("symbol must not be empty"));
        }
        if self.quantity.value() <= Decimal::ZERO {
            return Err(ExchangeError::validation(format!(
                "quantity must be positive, got {}",
                self.quantity
            )));
        }

        match (self.order_type, self.price) {
            (OrderType::Limit, None) => {
                return Err(ExchangeError::validation("LIMIT order requires a price"));
            }
            (OrderType::Limit, Some(price)) if price.value() <= Decimal::ZERO => {
                return Err(ExchangeError::validation(format!(
                    "price must be positive, got {}",
                    price
                )));
            }
            (OrderType::Market, Some(_)) => {
                return Err(ExchangeError::validation("MARKET order must not carry a price"));
            }
            _ => {}
        }

        if self.order_type == OrderType::Market && self.time_in_force.is_some() {
            return Err(ExchangeError::validation(
                "time in force only applies to LIMIT orders",
            ));
        }

        if let Some(id) = &self.client_order_id {
            validate_client_order_id(id)?;
        }

        Ok(())
    }
}

/// Trimmed and uppercased; `" btcusdt "` becomes `"BTCUSDT"`.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

pub fn validate_client_order_id(id: &str) -> Result<(), ExchangeError> {
    let valid_chars = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if id.is_empty() || id.len() > MAX_CLIENT_ORDER_ID_LEN || !valid_chars {
        return Err(ExchangeError::validation(format!(
            "client order id must be 1..={} chars of [A-Za-z0-9._-], got '{}'",
            MAX_CLIENT_ORDER_ID_LEN, id
        )));
    }
    Ok(())
}

/// Identifies an existing order, either by exchange id or by the caller's id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderRef {
    OrderId(u64),
    ClientOrderId(String),
}

/// One asset line of the account balance, in the order the exchange sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub asset: String,
    pub total: Quantity,
    pub available: Quantity,
}

/// What the exchange returns after accepting, querying or cancelling an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAck {
    pub order_id: u64,
    pub client_order_id: String,
    pub symbol: String,
    pub status: String,
    pub side: OrderSide,
    pub order_type: String,
    pub quantity: Quantity,
    pub price: Price,
    pub executed_quantity: Quantity,
    pub time_in_force: Option<String>,
    pub reduce_only: bool,
    pub update_time: i64,
}
