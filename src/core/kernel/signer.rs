use crate::core::errors::ExchangeError;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Produces the signature appended to a canonical query string.
pub trait Signer: Send + Sync {
    /// Sign the exact bytes that will be sent, returning the value of the
    /// `signature` parameter.
    fn sign(&self, canonical_query: &str) -> Result<String, ExchangeError>;
}

/// Lowercase hex HMAC-SHA256 of `payload` keyed by `secret`.
pub fn sign_hmac_sha256(payload: &str, secret: &str) -> Result<String, ExchangeError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ExchangeError::Configuration(format!("Invalid secret key: {}", e)))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// HMAC-SHA256 signer holding the API secret.
///
/// The secret is only ever used as the MAC key. `Debug` does not print it.
pub struct HmacSigner {
    secret_key: Secret<String>,
}

impl HmacSigner {
    /// Fails when the secret is empty: a signer without a key is a
    /// configuration mistake, not something to discover per call.
    pub fn new(secret_key: Secret<String>) -> Result<Self, ExchangeError> {
        if secret_key.expose_secret().is_empty() {
            return Err(ExchangeError::Configuration(
                "API secret is required for signing".to_string(),
            ));
        }
        Ok(Self { secret_key })
    }
}

impl std::fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSigner")
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

impl Signer for HmacSigner {
    fn sign(&self, canonical_query: &str) -> Result<String, ExchangeError> {
        sign_hmac_sha256(canonical_query, self.secret_key.expose_secret())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc4231_case_2() {
        assert_eq!(
            sign_hmac_sha256("what do ya want for nothing?", "Jefe").unwrap(),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_exchange_documented_example() {
        let secret = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
        let query = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
        assert_eq!(
            sign_hmac_sha256(query, secret).unwrap(),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn test_signing_is_deterministic() {
        let signer = HmacSigner::new(Secret::new("secret".to_string())).unwrap();
        let query = "quantity=0.01&side=BUY&symbol=BTCUSDT&timestamp=1&recvWindow=5000";
        let first = signer.sign(query).unwrap();
        assert_eq!(first, signer.sign(query).unwrap());
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_single_value_change_changes_signature() {
        let signer = HmacSigner::new(Secret::new("secret".to_string())).unwrap();
        let a = signer.sign("quantity=0.01&symbol=BTCUSDT").unwrap();
        let b = signer.sign("quantity=0.02&symbol=BTCUSDT").unwrap();
        let c = signer.sign("quantity=0.01&symbol=ETHUSDT").unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn test_empty_secret_is_configuration_error() {
        let err = HmacSigner::new(Secret::new(String::new())).unwrap_err();
        assert!(matches!(err, ExchangeError::Configuration(_)));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let signer = HmacSigner::new(Secret::new("top-secret".to_string())).unwrap();
        assert!(!format!("{:?}", signer).contains("top-secret"));
    }
}
