use anyhow::Context;
use fapi_trader::core::config::ExchangeConfig;
use fapi_trader::utils::default_backoff;
use fapi_trader::build_client;
use tracing_subscriber::EnvFilter;

const ENV_PREFIX: &str = "BINANCE_PERP";

#[cfg(feature = "env-file")]
fn load_config() -> Result<ExchangeConfig, fapi_trader::ConfigError> {
    ExchangeConfig::from_env_file(ENV_PREFIX)
}

#[cfg(not(feature = "env-file"))]
fn load_config() -> Result<ExchangeConfig, fapi_trader::ConfigError> {
    ExchangeConfig::from_env(ENV_PREFIX)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Set BINANCE_PERP_API_KEY and BINANCE_PERP_SECRET_KEY, and
    // BINANCE_PERP_TESTNET=true to stay off mainnet.
    let config = load_config().with_context(|| {
        format!("Failed to load configuration from {ENV_PREFIX}_* environment variables")
    })?;
    tracing::info!(base_url = %config.resolved_base_url(), "Loaded configuration");

    let client = build_client(config).context("Failed to build trading client")?;

    let balances = client
        .get_balance_with_retry(default_backoff(3))
        .await
        .context("Balance query failed")?;

    println!("{:<10} {:>24} {:>24}", "ASSET", "TOTAL", "AVAILABLE");
    for entry in &balances {
        println!(
            "{:<10} {:>24} {:>24}",
            entry.asset,
            entry.total.to_string(),
            entry.available.to_string()
        );
    }

    Ok(())
}
