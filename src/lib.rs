//! Signed trading client for the Binance USDⓈ-M perpetual futures REST API.
//!
//! ```rust,no_run
//! use fapi_trader::{build_client, ExchangeConfig};
//! use rust_decimal::Decimal;
//!
//! # async fn example() -> Result<(), fapi_trader::ExchangeError> {
//! let config = ExchangeConfig::new("key".to_string(), "secret".to_string()).testnet(true);
//! let client = build_client(config)?;
//!
//! for entry in client.get_balance().await? {
//!     println!("{}: {} available", entry.asset, entry.available);
//! }
//! client
//!     .place_market_order("btcusdt", "buy", Decimal::new(1, 2), false)
//!     .await?;
//! # Ok(())
//! # }
//! ```
pub mod core;
pub mod exchanges;
pub mod utils;

pub use core::audit::{
    AuditEntry, AuditOutcome, AuditSink, ChannelAuditSink, NoopAuditSink, TracingAuditSink,
};
pub use core::config::{ConfigError, ExchangeConfig};
pub use core::errors::{ExchangeError, TransportKind};
pub use core::types::*;
pub use exchanges::binance_perp::{build_client, BinancePerpBuilder, TradingClient};
