use crate::models::*;
use async_trait::async_trait;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Exchange Trait
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the exchange.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// The exchange answered with a non-2xx status. `payload` is its error
    /// body, or `{"msg": <text>}` when the body was not JSON.
    #[error("Exchange rejected request (HTTP {status})")]
    Rejected { status: u16, payload: Value },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Signing error: {0}")]
    Signing(String),
}

impl ExchangeError {
    /// The exchange's own error message (`msg`), when it sent one.
    pub fn exchange_message(&self) -> Option<&str> {
        match self {
            ExchangeError::Rejected { payload, .. } => payload.get("msg").and_then(Value::as_str),
            _ => None,
        }
    }
}

/// The exchange operations the RPC surface forwards to.
///
/// Every call is one stateless round trip; results are the exchange's JSON
/// passed through untouched.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Account snapshot (balances, permissions, commission rates).
    async fn account(&self, params: &AccountParams) -> Result<Value, ExchangeError>;

    /// Working orders, for one symbol or all of them.
    async fn open_orders(&self, params: &OpenOrdersParams) -> Result<Value, ExchangeError>;

    /// The account's trade history for a symbol.
    async fn trades(&self, params: &TradesParams) -> Result<Value, ExchangeError>;

    /// Place an order, or only validate it when `params.test` is set.
    async fn place_order(&self, params: &PlaceOrderParams) -> Result<Value, ExchangeError>;

    /// Raw kline rows. Public data, no signing.
    async fn candles(&self, params: &CandlesParams) -> Result<Value, ExchangeError>;
}
