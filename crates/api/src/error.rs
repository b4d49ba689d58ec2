//! Maps exchange failures into the JSON-RPC application error range.

use binrpc_core::{code, ErrorObject, ExchangeError};
use serde_json::json;

/// Convert an [`ExchangeError`] into the error object sent to the caller.
///
/// Rejections keep the exchange's status and body under `data` so callers
/// can act on Binance's own error codes.
pub fn to_rpc_error(err: ExchangeError) -> ErrorObject {
    let detail = err.exchange_message().map(str::to_string);
    match err {
        ExchangeError::Rejected { status, payload } => {
            let message = match detail {
                Some(msg) => format!("Exchange error (HTTP {}): {}", status, msg),
                None => format!("Exchange error (HTTP {})", status),
            };
            ErrorObject::new(code::EXCHANGE_ERROR, message)
                .with_data(json!({ "status": status, "payload": payload }))
        }
        err @ ExchangeError::Network(_) => ErrorObject::new(code::NETWORK_ERROR, err.to_string()),
        err @ ExchangeError::Signing(_) => ErrorObject::new(code::SIGNING_ERROR, err.to_string()),
    }
}
