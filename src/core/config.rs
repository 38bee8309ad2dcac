use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;
use std::time::Duration;

pub const MAINNET_BASE_URL: &str = "https://fapi.binance.com";
pub const TESTNET_BASE_URL: &str = "https://testnet.binancefuture.com";

pub const DEFAULT_RECV_WINDOW_MS: u64 = 5000;
/// Largest receive window the exchange accepts.
pub const MAX_RECV_WINDOW_MS: u64 = 60_000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    pub testnet: bool,
    pub base_url: Option<String>,
    pub recv_window_ms: u64,
    pub timeout: Duration,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for ExchangeConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ExchangeConfig", 6)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field("testnet", &self.testnet)?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("recv_window_ms", &self.recv_window_ms)?;
        state.serialize_field("timeout_ms", &(self.timeout.as_millis() as u64))?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ExchangeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ExchangeConfigHelper {
            api_key: String,
            secret_key: String,
            #[serde(default)]
            testnet: bool,
            base_url: Option<String>,
            recv_window_ms: Option<u64>,
            timeout_ms: Option<u64>,
        }

        let helper = ExchangeConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            api_key: Secret::new(helper.api_key),
            secret_key: Secret::new(helper.secret_key),
            testnet: helper.testnet,
            base_url: helper.base_url,
            recv_window_ms: helper.recv_window_ms.unwrap_or(DEFAULT_RECV_WINDOW_MS),
            timeout: helper
                .timeout_ms
                .map_or(DEFAULT_TIMEOUT, Duration::from_millis),
        })
    }
}

impl ExchangeConfig {
    /// Create a new configuration with API credentials
    #[must_use]
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            testnet: false,
            base_url: None,
            recv_window_ms: DEFAULT_RECV_WINDOW_MS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{PREFIX}_API_KEY` (e.g., `BINANCE_PERP_API_KEY`)
    /// - `{PREFIX}_SECRET_KEY`
    /// - `{PREFIX}_TESTNET` (optional, defaults to false)
    /// - `{PREFIX}_BASE_URL` (optional)
    /// - `{PREFIX}_RECV_WINDOW` (optional, milliseconds)
    /// - `{PREFIX}_TIMEOUT_MS` (optional)
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let prefix = prefix.to_uppercase();
        let api_key_var = format!("{}_API_KEY", prefix);
        let secret_key_var = format!("{}_SECRET_KEY", prefix);

        let api_key = env::var(&api_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(api_key_var))?;
        let secret_key = env::var(&secret_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(secret_key_var))?;

        let testnet = parse_optional_bool(&format!("{}_TESTNET", prefix))?.unwrap_or(false);

        let base_url = env::var(format!("{}_BASE_URL", prefix)).ok();

        let recv_window_ms =
            parse_optional_u64(&format!("{}_RECV_WINDOW", prefix))?.unwrap_or(DEFAULT_RECV_WINDOW_MS);
        let timeout = parse_optional_u64(&format!("{}_TIMEOUT_MS", prefix))?
            .map_or(DEFAULT_TIMEOUT, Duration::from_millis);

        Ok(Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            testnet,
            base_url,
            recv_window_ms,
            timeout,
        })
    }

    /// Create configuration from a .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(prefix, ".env")
    }

    /// Same as [`Self::from_env_file`] with an explicit file path.
    /// A missing file is not an error; the process environment is used as-is.
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(prefix: &str, env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(prefix)
    }

    /// Check if this configuration has credentials for signed requests
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.secret_key.expose_secret().is_empty()
    }

    /// Set testnet mode
    #[must_use]
    pub const fn testnet(mut self, testnet: bool) -> Self {
        self.testnet = testnet;
        self
    }

    /// Set custom base URL
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    #[must_use]
    pub const fn recv_window(mut self, recv_window_ms: u64) -> Self {
        self.recv_window_ms = recv_window_ms;
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL requests are sent to, without a trailing slash.
    pub fn resolved_base_url(&self) -> String {
        let url = match &self.base_url {
            Some(url) => url.as_str(),
            None if self.testnet => TESTNET_BASE_URL,
            None => MAINNET_BASE_URL,
        };
        url.trim_end_matches('/').to_string()
    }

    /// Check everything a signed client needs before any call is attempted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.expose_secret().is_empty() {
            return Err(ConfigError::MissingCredential("api_key"));
        }
        if self.secret_key.expose_secret().is_empty() {
            return Err(ConfigError::MissingCredential("secret_key"));
        }
        if self.recv_window_ms == 0 || self.recv_window_ms > MAX_RECV_WINDOW_MS {
            return Err(ConfigError::InvalidConfiguration(format!(
                "recv_window_ms must be within 1..={}, got {}",
                MAX_RECV_WINDOW_MS, self.recv_window_ms
            )));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidConfiguration(
                "timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// `true`/`false`/`1`/`0`, case-insensitive. Anything else is an error so a
/// typo cannot silently select mainnet.
fn parse_optional_bool(var: &str) -> Result<Option<bool>, ConfigError> {
    match env::var(var) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidConfiguration(format!(
                "{} must be true or false, got '{}'",
                var, raw
            ))),
        },
        Err(_) => Ok(None),
    }
}

fn parse_optional_u64(var: &str) -> Result<Option<u64>, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw.trim().parse::<u64>().map(Some).map_err(|e| {
            ConfigError::InvalidConfiguration(format!("{} is not a valid integer: {}", var, e))
        }),
        Err(_) => Ok(None),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_and_serialize_redact_secrets() {
        let config = ExchangeConfig::new("my-key".to_string(), "my-secret".to_string());

        let debug = format!("{:?}", config);
        assert!(!debug.contains("my-secret"));
        assert!(!debug.contains("my-key"));

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("my-secret"));
        assert!(json.contains("[REDACTED]"));
        assert!(json.contains("\"recv_window_ms\":5000"));
    }

    #[test]
    fn test_base_url_resolution() {
        let config = ExchangeConfig::new("k".into(), "s".into());
        assert_eq!(config.resolved_base_url(), MAINNET_BASE_URL);

        let config = config.testnet(true);
        assert_eq!(config.resolved_base_url(), TESTNET_BASE_URL);

        let config = config.base_url("http://127.0.0.1:9000/".to_string());
        assert_eq!(config.resolved_base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_validate_rejects_missing_credentials() {
        let config = ExchangeConfig::new(String::new(), "s".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingCredential("api_key"))
        ));

        let config = ExchangeConfig::new("k".into(), String::new());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingCredential("secret_key"))
        ));
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_validate_recv_window_bounds() {
        let base = ExchangeConfig::new("k".into(), "s".into());
        assert!(base.clone().recv_window(1).validate().is_ok());
        assert!(base.clone().recv_window(MAX_RECV_WINDOW_MS).validate().is_ok());
        assert!(base.clone().recv_window(0).validate().is_err());
        assert!(base.recv_window(MAX_RECV_WINDOW_MS + 1).validate().is_err());
    }

    #[test]
    fn test_from_env_reads_prefixed_variables() {
        env::set_var("FAPI_CFG_TEST_API_KEY", "env-key");
        env::set_var("FAPI_CFG_TEST_SECRET_KEY", "env-secret");
        env::set_var("FAPI_CFG_TEST_TESTNET", "true");
        env::set_var("FAPI_CFG_TEST_RECV_WINDOW", "7000");

        let config = ExchangeConfig::from_env("fapi_cfg_test").unwrap();
        assert_eq!(config.api_key(), "env-key");
        assert!(config.testnet);
        assert_eq!(config.recv_window_ms, 7000);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_from_env_testnet_flag_spellings() {
        env::set_var("FAPI_CFG_FLAG_API_KEY", "k");
        env::set_var("FAPI_CFG_FLAG_SECRET_KEY", "s");

        for (raw, expected) in [("1", true), ("TRUE", true), ("0", false), (" false ", false)] {
            env::set_var("FAPI_CFG_FLAG_TESTNET", raw);
            let config = ExchangeConfig::from_env("FAPI_CFG_FLAG").unwrap();
            assert_eq!(config.testnet, expected, "value {raw:?}");
        }
    }

    #[test]
    fn test_from_env_missing_key() {
        let err = ExchangeConfig::from_env("FAPI_CFG_DOES_NOT_EXIST").unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvironmentVariable(ref v) if v == "FAPI_CFG_DOES_NOT_EXIST_API_KEY"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: ExchangeConfig =
            serde_json::from_str(r#"{"api_key":"k","secret_key":"s"}"#).unwrap();
        assert_eq!(config.recv_window_ms, DEFAULT_RECV_WINDOW_MS);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(!config.testnet);
    }
}
