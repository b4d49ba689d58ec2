use async_trait::async_trait;
use binrpc_core::*;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::BinanceConfig;
use crate::signing::{self, Query};

const ACCOUNT_PATH: &str = "/api/v3/account";
const OPEN_ORDERS_PATH: &str = "/api/v3/openOrders";
const MY_TRADES_PATH: &str = "/api/v3/myTrades";
const ORDER_PATH: &str = "/api/v3/order";
const ORDER_TEST_PATH: &str = "/api/v3/order/test";
const KLINES_PATH: &str = "/api/v3/klines";

const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Binance spot REST client.
///
/// Holds one pooled HTTP client for the life of the process. Signed calls
/// carry the API key header and an HMAC-SHA256 signature over the query.
pub struct BinanceClient {
    config: BinanceConfig,
    http: reqwest::Client,
}

impl BinanceClient {
    pub fn new(config: BinanceConfig) -> Result<Self, ExchangeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ExchangeError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &BinanceConfig {
        &self.config
    }

    /// Issue a signed request. GET parameters travel in the URL, everything
    /// else in a form-encoded body.
    async fn signed(&self, method: Method, path: &str, query: Query) -> Result<Value, ExchangeError> {
        let query = if query.contains("recvWindow") {
            query
        } else {
            query.push_opt("recvWindow", self.config.recv_window)
        };
        let payload = signing::signed_payload(
            query,
            self.config.credentials.api_secret(),
            Utc::now().timestamp_millis(),
        )?;

        let url = format!("{}{}", self.config.base_url, path);
        let builder = if method == Method::GET {
            self.http.get(format!("{}?{}", url, payload))
        } else {
            self.http
                .request(method.clone(), url)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(payload)
        };

        debug!(%method, path, "Sending signed request");
        self.send(
            builder.header(API_KEY_HEADER, self.config.credentials.api_key()),
            path,
        )
        .await
    }

    /// Issue an unsigned GET.
    async fn public(&self, path: &str, query: Query) -> Result<Value, ExchangeError> {
        let url = if query.is_empty() {
            format!("{}{}", self.config.base_url, path)
        } else {
            format!("{}{}?{}", self.config.base_url, path, query.encode())
        };

        debug!(path, "Sending public request");
        self.send(self.http.get(url), path).await
    }

    async fn send(&self, builder: RequestBuilder, path: &str) -> Result<Value, ExchangeError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ExchangeError::Network(e.without_url().to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ExchangeError::Network(format!("Failed to read response body: {}", e.without_url()))
        })?;

        if status.is_success() {
            return Ok(decode_body(body));
        }

        let payload = serde_json::from_str(&body).unwrap_or_else(|_| json!({ "msg": body }));
        warn!(path, status = status.as_u16(), %payload, "Exchange rejected request");
        Err(ExchangeError::Rejected {
            status: status.as_u16(),
            payload,
        })
    }
}

/// JSON bodies pass through as-is; anything else becomes a JSON string.
fn decode_body(body: String) -> Value {
    serde_json::from_str(&body).unwrap_or(Value::String(body))
}

#[async_trait]
impl Exchange for BinanceClient {
    async fn account(&self, params: &AccountParams) -> Result<Value, ExchangeError> {
        let query = Query::new().push_opt("recvWindow", params.recv_window);
        self.signed(Method::GET, ACCOUNT_PATH, query).await
    }

    async fn open_orders(&self, params: &OpenOrdersParams) -> Result<Value, ExchangeError> {
        let query = Query::new()
            .push_opt("symbol", params.symbol.as_ref())
            .push_opt("recvWindow", params.recv_window);
        self.signed(Method::GET, OPEN_ORDERS_PATH, query).await
    }

    async fn trades(&self, params: &TradesParams) -> Result<Value, ExchangeError> {
        let query = Query::new()
            .push("symbol", &params.symbol)
            .push_opt("limit", params.limit)
            .push_opt("recvWindow", params.recv_window);
        self.signed(Method::GET, MY_TRADES_PATH, query).await
    }

    async fn place_order(&self, params: &PlaceOrderParams) -> Result<Value, ExchangeError> {
        let query = Query::new()
            .push("symbol", &params.symbol)
            .push("side", params.side.as_str())
            .push("type", params.order_type.as_str())
            .push_opt("timeInForce", params.time_in_force.map(|t| t.as_str()))
            .push_opt("quantity", params.quantity)
            .push_opt("quoteOrderQty", params.quote_order_qty)
            .push_opt("price", params.price)
            .push_opt("stopPrice", params.stop_price)
            .push_opt("recvWindow", params.recv_window);

        let path = if params.test { ORDER_TEST_PATH } else { ORDER_PATH };
        info!(
            symbol = %params.symbol,
            side = params.side.as_str(),
            order_type = params.order_type.as_str(),
            test = params.test,
            "Placing order"
        );
        self.signed(Method::POST, path, query).await
    }

    async fn candles(&self, params: &CandlesParams) -> Result<Value, ExchangeError> {
        let query = Query::new()
            .push("symbol", &params.symbol)
            .push("interval", params.interval.as_str())
            .push_opt("startTime", params.start_time)
            .push_opt("endTime", params.end_time)
            .push_opt("limit", params.limit);
        self.public(KLINES_PATH, query).await
    }
}
