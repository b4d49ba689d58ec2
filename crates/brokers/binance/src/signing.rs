use binrpc_core::ExchangeError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::form_urlencoded;

type HmacSha256 = Hmac<Sha256>;

/// Query parameters in the order they will be sent.
///
/// The signature covers the exact encoded string, so order is significant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, key: &'static str, value: impl ToString) -> Self {
        self.pairs.push((key, value.to_string()));
        self
    }

    /// Push `value` only when present.
    pub fn push_opt<T: ToString>(self, key: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| *k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `application/x-www-form-urlencoded` form of the pairs.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }
}

/// Hex-encoded HMAC-SHA256 of `payload` keyed by `secret`.
pub fn sign(secret: &str, payload: &str) -> Result<String, ExchangeError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ExchangeError::Signing(format!("Failed to create HMAC: {}", e)))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Append `timestamp`, sign the encoded string, and append `signature`.
pub fn signed_payload(query: Query, secret: &str, timestamp_ms: i64) -> Result<String, ExchangeError> {
    let encoded = query.push("timestamp", timestamp_ms).encode();
    let signature = sign(secret, &encoded)?;
    Ok(format!("{}&signature={}", encoded, signature))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Key, payload and signature from the Binance API documentation.
    const DOC_SECRET: &str = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
    const DOC_SIGNATURE: &str = "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71";

    fn doc_query() -> Query {
        Query::new()
            .push("symbol", "LTCBTC")
            .push("side", "BUY")
            .push("type", "LIMIT")
            .push("timeInForce", "GTC")
            .push("quantity", 1)
            .push("price", 0.1)
            .push("recvWindow", 5000)
    }

    #[test]
    fn test_sign_matches_documentation_example() {
        let payload = doc_query().push("timestamp", 1499827319559i64).encode();
        assert_eq!(
            payload,
            "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559"
        );
        assert_eq!(sign(DOC_SECRET, &payload).unwrap(), DOC_SIGNATURE);
    }

    #[test]
    fn test_signed_payload_appends_timestamp_and_signature() {
        let payload = signed_payload(doc_query(), DOC_SECRET, 1499827319559).unwrap();
        assert!(payload.ends_with(&format!("&timestamp=1499827319559&signature={}", DOC_SIGNATURE)));
    }

    #[test]
    fn test_push_opt_skips_missing_values() {
        let query = Query::new()
            .push_opt("symbol", Some("BTCUSDT"))
            .push_opt::<u32>("limit", None);
        assert_eq!(query.encode(), "symbol=BTCUSDT");
        assert!(query.contains("symbol"));
        assert!(!query.contains("limit"));
    }

    #[test]
    fn test_values_are_form_encoded() {
        let query = Query::new().push("note", "a b&c=d");
        assert_eq!(query.encode(), "note=a+b%26c%3Dd");
    }

    #[test]
    fn test_empty_query_signs_timestamp_only() {
        let payload = signed_payload(Query::new(), "secret", 1).unwrap();
        assert!(payload.starts_with("timestamp=1&signature="));
        assert_eq!(payload.len(), "timestamp=1&signature=".len() + 64);
    }
}
