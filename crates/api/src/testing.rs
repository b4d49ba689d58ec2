//! In-memory exchange for dispatcher and server tests.

use async_trait::async_trait;
use binrpc_core::*;
use serde_json::{json, Value};
use std::sync::Mutex;

/// Records every call it receives and answers with canned JSON, or with a
/// fixed error when one is set.
#[derive(Default)]
pub struct StubExchange {
    calls: Mutex<Vec<String>>,
    failure: Option<(u16, Value)>,
}

impl StubExchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call is rejected with this HTTP status and body.
    pub fn rejecting(status: u16, payload: Value) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some((status, payload)),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String, result: Value) -> Result<Value, ExchangeError> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some((status, payload)) => Err(ExchangeError::Rejected {
                status: *status,
                payload: payload.clone(),
            }),
            None => Ok(result),
        }
    }
}

#[async_trait]
impl Exchange for StubExchange {
    async fn account(&self, _params: &AccountParams) -> Result<Value, ExchangeError> {
        self.record("account".to_string(), json!({"balances": []}))
    }

    async fn open_orders(&self, params: &OpenOrdersParams) -> Result<Value, ExchangeError> {
        let symbol = params
            .symbol
            .as_ref()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "*".to_string());
        self.record(format!("open_orders {}", symbol), json!([]))
    }

    async fn trades(&self, params: &TradesParams) -> Result<Value, ExchangeError> {
        self.record(format!("trades {}", params.symbol), json!([]))
    }

    async fn place_order(&self, params: &PlaceOrderParams) -> Result<Value, ExchangeError> {
        let endpoint = if params.test { "test" } else { "live" };
        self.record(
            format!("place_order {} {}", endpoint, params.symbol),
            json!({"symbol": params.symbol.as_str()}),
        )
    }

    async fn candles(&self, params: &CandlesParams) -> Result<Value, ExchangeError> {
        self.record(
            format!("candles {} {}", params.symbol, params.interval.as_str()),
            json!([[0, "1", "2", "0.5", "1.5", "10"]]),
        )
    }
}
