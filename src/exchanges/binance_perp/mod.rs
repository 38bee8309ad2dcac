// Core modules - one responsibility per file
pub mod conversions; // Decimal ↔︎ wire strings, core ↔︎ exchange types
pub mod rest; // thin typed wrapper around the signed executor
pub mod types; // serde structs ← raw JSON

pub mod builder; // fluent builder → concrete client
pub mod client; // public trading operations

// Re-export main types for easier importing
pub use builder::{build_client, BinancePerpBuilder};
pub use client::TradingClient;
pub use conversions::*;
pub use rest::{BinancePerpRestClient, BALANCE_PATH, ORDER_PATH};
pub use types::*;
