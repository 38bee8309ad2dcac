pub mod audit;
pub mod config;
pub mod errors;
pub mod kernel;
pub mod types;
