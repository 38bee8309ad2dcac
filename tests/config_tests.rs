use fapi_trader::{build_client, ConfigError, ExchangeConfig, ExchangeError};
use std::time::Duration;

#[cfg(feature = "env-file")]
#[test]
fn test_env_file_loading() {
    let path = std::env::temp_dir().join(format!("fapi-trader-{}.env", std::process::id()));
    std::fs::write(
        &path,
        "FAPI_ENVFILE_API_KEY=file-key\n\
         FAPI_ENVFILE_SECRET_KEY=file-secret\n\
         FAPI_ENVFILE_TESTNET=true\n\
         FAPI_ENVFILE_TIMEOUT_MS=2500\n",
    )
    .unwrap();

    let config =
        ExchangeConfig::from_env_file_with_path("FAPI_ENVFILE", path.to_str().unwrap()).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.api_key(), "file-key");
    assert!(config.testnet);
    assert_eq!(config.timeout, Duration::from_millis(2500));
    assert_eq!(
        config.resolved_base_url(),
        fapi_trader::core::config::TESTNET_BASE_URL
    );
}

#[cfg(feature = "env-file")]
#[test]
fn test_missing_env_file_falls_back_to_environment() {
    std::env::set_var("FAPI_NOFILE_API_KEY", "k");
    std::env::set_var("FAPI_NOFILE_SECRET_KEY", "s");

    let config =
        ExchangeConfig::from_env_file_with_path("FAPI_NOFILE", "/nonexistent/fapi.env").unwrap();
    assert_eq!(config.api_key(), "k");
}

#[test]
fn test_invalid_numeric_variable_rejected() {
    std::env::set_var("FAPI_BADNUM_API_KEY", "k");
    std::env::set_var("FAPI_BADNUM_SECRET_KEY", "s");
    std::env::set_var("FAPI_BADNUM_RECV_WINDOW", "five seconds");

    let err = ExchangeConfig::from_env("FAPI_BADNUM").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidConfiguration(_)));
}

#[test]
fn test_unrecognised_testnet_flag_rejected() {
    std::env::set_var("FAPI_BADFLAG_API_KEY", "k");
    std::env::set_var("FAPI_BADFLAG_SECRET_KEY", "s");

    for raw in ["yes", "ture", "on", ""] {
        std::env::set_var("FAPI_BADFLAG_TESTNET", raw);
        let err = ExchangeConfig::from_env("FAPI_BADFLAG").unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidConfiguration(_)),
            "value {raw:?} gave {err:?}"
        );
    }
}

#[test]
fn test_numeric_testnet_flag_selects_testnet() {
    std::env::set_var("FAPI_NUMFLAG_API_KEY", "k");
    std::env::set_var("FAPI_NUMFLAG_SECRET_KEY", "s");
    std::env::set_var("FAPI_NUMFLAG_TESTNET", "1");

    let config = ExchangeConfig::from_env("FAPI_NUMFLAG").unwrap();
    assert!(config.testnet);
    assert_eq!(
        config.resolved_base_url(),
        fapi_trader::core::config::TESTNET_BASE_URL
    );
}

#[tokio::test]
async fn test_bad_config_fails_before_any_call() {
    let config = ExchangeConfig::new("k".to_string(), "s".to_string()).recv_window(0);
    let err = build_client(config).unwrap_err();
    assert!(matches!(err, ExchangeError::Configuration(_)));
}
