use binrpc_core::*;
use chrono::Utc;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::to_rpc_error;
use crate::methods::Method;

/// Routes JSON-RPC requests to the exchange, one at a time.
pub struct Dispatcher<E> {
    exchange: E,
}

impl<E: Exchange> Dispatcher<E> {
    pub fn new(exchange: E) -> Self {
        Self { exchange }
    }

    pub fn exchange(&self) -> &E {
        &self.exchange
    }

    /// Handle one raw input line.
    ///
    /// Returns `None` only for well-formed notifications; anything that
    /// cannot be read as a request is always answered.
    pub async fn handle_line(&self, line: &str) -> Option<Response> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "Unparseable input line");
                return Some(Response::error(Id::Null, ErrorObject::parse_error()));
            }
        };

        match Request::from_value(value) {
            Ok(request) => self.handle_request(request).await,
            Err(MalformedRequest { id }) => {
                debug!(%id, "Malformed request");
                Some(Response::error(id, ErrorObject::invalid_request()))
            }
        }
    }

    /// Handle a structurally valid request.
    pub async fn handle_request(&self, request: Request) -> Option<Response> {
        let started = Instant::now();
        let outcome = self.call(&request.method, request.params).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Ok(_) => debug!(method = %request.method, elapsed_ms, "Request handled"),
            Err(e) if code::is_application(e.code) => {
                warn!(method = %request.method, code = e.code, message = %e.message, elapsed_ms, "Request failed");
            }
            Err(e) => debug!(method = %request.method, code = e.code, "Request rejected"),
        }

        let id = request.id?;
        Some(match outcome {
            Ok(result) => Response::success(id, result),
            Err(error) => Response::error(id, error),
        })
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, ErrorObject> {
        let method: Method = method.parse().map_err(|_| ErrorObject::method_not_found())?;

        match method {
            Method::Ping => Ok(ping()),
            Method::GetAccount => {
                let params: AccountParams = decode(params)?;
                self.exchange.account(&params).await.map_err(to_rpc_error)
            }
            Method::GetOpenOrders => {
                let params: OpenOrdersParams = decode(params)?;
                self.exchange.open_orders(&params).await.map_err(to_rpc_error)
            }
            Method::GetTrades => {
                let params: TradesParams = decode(params)?;
                self.exchange.trades(&params).await.map_err(to_rpc_error)
            }
            Method::PlaceOrder => {
                let params: PlaceOrderParams = decode(params)?;
                self.exchange.place_order(&params).await.map_err(to_rpc_error)
            }
            Method::GetCandles => {
                let params: CandlesParams = decode(params)?;
                self.exchange.candles(&params).await.map_err(to_rpc_error)
            }
        }
    }
}

/// Answered from the local clock; the exchange is not contacted.
fn ping() -> Value {
    json!({ "pong": true, "time": Utc::now().timestamp_millis() })
}

fn decode<P: MethodParams>(params: Value) -> Result<P, ErrorObject> {
    P::from_value(params).map_err(|e| ErrorObject::invalid_params(e.0))
}
