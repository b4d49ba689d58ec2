use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// The only protocol version this server speaks.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC error codes.
///
/// The `-32700..=-32600` block is reserved by the protocol; the
/// `-32000..=-32099` block is the server-defined application range.
pub mod code {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    /// The exchange answered with a non-2xx status.
    pub const EXCHANGE_ERROR: i64 = -32000;
    /// The exchange could not be reached, or its response could not be read.
    pub const NETWORK_ERROR: i64 = -32001;
    /// The request could not be signed.
    pub const SIGNING_ERROR: i64 = -32002;

    /// Whether `code` falls in the server-defined application range.
    pub fn is_application(code: i64) -> bool {
        (-32099..=-32000).contains(&code)
    }
}

// ---------------------------------------------------------------------------
// Id
// ---------------------------------------------------------------------------

/// A request id, echoed back verbatim.
///
/// Integers within the `i64`/`u64` range are echoed exactly and floats stay
/// floats (`1` stays `1`, `1.0` stays `1.0`). Other numeric spellings are
/// normalized through `f64`, so `1e2` comes back as `100.0`. Strings are
/// never coerced to numbers or the other way round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(Number),
    String(String),
    Null,
}

impl Id {
    /// Accepts the three id shapes the protocol allows.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Id::Number(n)),
            Value::String(s) => Some(Id::String(s)),
            Value::Null => Some(Id::Null),
            _ => None,
        }
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n.into())
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::String(s.to_string())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{}", n),
            Id::String(s) => write!(f, "{:?}", s),
            Id::Null => f.write_str("null"),
        }
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A structurally valid JSON-RPC request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// `None` when the `id` member was absent, which makes this a notification.
    pub id: Option<Id>,
    pub method: String,
    /// An object, an array, or `Null` when params were omitted.
    pub params: Value,
}

/// A request that failed structural validation.
///
/// Carries the id to answer with: the request's own id when it could be
/// read, otherwise `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedRequest {
    pub id: Id,
}

impl Request {
    /// Validate the envelope of a decoded JSON value.
    ///
    /// Batches (top-level arrays) are not supported and are rejected here.
    pub fn from_value(value: Value) -> Result<Self, MalformedRequest> {
        let Value::Object(mut obj) = value else {
            return Err(MalformedRequest { id: Id::Null });
        };

        let id = match obj.remove("id") {
            None => None,
            Some(raw) => Some(Id::from_value(raw).ok_or(MalformedRequest { id: Id::Null })?),
        };
        let malformed = || MalformedRequest {
            id: id.clone().unwrap_or(Id::Null),
        };

        if obj.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return Err(malformed());
        }

        let method = match obj.remove("method") {
            Some(Value::String(method)) => method,
            _ => return Err(malformed()),
        };

        let params = match obj.remove("params") {
            None | Some(Value::Null) => Value::Null,
            Some(params @ (Value::Object(_) | Value::Array(_))) => params,
            Some(_) => return Err(malformed()),
        };

        Ok(Self { id, method, params })
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// The `error` member of a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorObject {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn parse_error() -> Self {
        Self::new(code::PARSE_ERROR, "Parse error")
    }

    pub fn invalid_request() -> Self {
        Self::new(code::INVALID_REQUEST, "Invalid Request")
    }

    pub fn method_not_found() -> Self {
        Self::new(code::METHOD_NOT_FOUND, "Method not found")
    }

    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self::new(code::INVALID_PARAMS, "Invalid params").with_data(Value::String(detail.into()))
    }

    pub fn internal_error() -> Self {
        Self::new(code::INTERNAL_ERROR, "Internal error")
    }
}

/// Either half of a response; serialized as a `result` or `error` member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(ErrorObject),
}

/// A JSON-RPC response, one per non-notification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    pub id: Id,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl Response {
    pub fn success(id: Id, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome: Outcome::Result(result),
        }
    }

    pub fn error(id: Id, error: ErrorObject) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome: Outcome::Error(error),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }
}
