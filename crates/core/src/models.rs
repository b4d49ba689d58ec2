use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;

// ---------------------------------------------------------------------------
// Params decoding
// ---------------------------------------------------------------------------

/// Params did not match the schema of the method they were sent to.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct InvalidParams(pub String);

/// A typed parameter schema for one RPC method.
pub trait MethodParams: DeserializeOwned {
    /// Cross-field checks that serde alone cannot express.
    fn validate(&self) -> Result<(), InvalidParams> {
        Ok(())
    }

    /// Decode and validate raw params. Omitted params decode as `{}`;
    /// positional (array) params are rejected, since field order is not
    /// part of the wire format.
    fn from_value(value: Value) -> Result<Self, InvalidParams> {
        let value = match value {
            Value::Null => Value::Object(Map::new()),
            Value::Array(_) => return Err(InvalidParams("params must be an object".to_string())),
            other => other,
        };
        let params: Self =
            serde_json::from_value(value).map_err(|e| InvalidParams(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }
}

// ---------------------------------------------------------------------------
// Symbol
// ---------------------------------------------------------------------------

/// A trading pair symbol (e.g. BTCUSDT), trimmed and upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Symbol {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        let symbol = raw.trim().to_ascii_uppercase();
        if symbol.is_empty() {
            return Err("symbol must not be empty".to_string());
        }
        Ok(Symbol(symbol))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Order enums
// ---------------------------------------------------------------------------

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl TryFrom<String> for Side {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            _ => Err(format!("unknown side `{}`, expected BUY or SELL", raw)),
        }
    }
}

/// The type of order, as the exchange names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum OrderType {
    Limit,
    Market,
    StopLoss,
    StopLossLimit,
    TakeProfit,
    TakeProfitLimit,
    LimitMaker,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Limit => "LIMIT",
            OrderType::Market => "MARKET",
            OrderType::StopLoss => "STOP_LOSS",
            OrderType::StopLossLimit => "STOP_LOSS_LIMIT",
            OrderType::TakeProfit => "TAKE_PROFIT",
            OrderType::TakeProfitLimit => "TAKE_PROFIT_LIMIT",
            OrderType::LimitMaker => "LIMIT_MAKER",
        }
    }
}

impl TryFrom<String> for OrderType {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "LIMIT" => Ok(OrderType::Limit),
            "MARKET" => Ok(OrderType::Market),
            "STOP_LOSS" => Ok(OrderType::StopLoss),
            "STOP_LOSS_LIMIT" => Ok(OrderType::StopLossLimit),
            "TAKE_PROFIT" => Ok(OrderType::TakeProfit),
            "TAKE_PROFIT_LIMIT" => Ok(OrderType::TakeProfitLimit),
            "LIMIT_MAKER" => Ok(OrderType::LimitMaker),
            _ => Err(format!("unknown order type `{}`", raw)),
        }
    }
}

/// How long a limit order stays working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum TimeInForce {
    /// Good 'til cancelled.
    Gtc,
    /// Immediate or cancel.
    Ioc,
    /// Fill or kill.
    Fok,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Gtc => "GTC",
            TimeInForce::Ioc => "IOC",
            TimeInForce::Fok => "FOK",
        }
    }
}

impl TryFrom<String> for TimeInForce {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "GTC" => Ok(TimeInForce::Gtc),
            "IOC" => Ok(TimeInForce::Ioc),
            "FOK" => Ok(TimeInForce::Fok),
            _ => Err(format!("unknown timeInForce `{}`, expected GTC, IOC or FOK", raw)),
        }
    }
}

// ---------------------------------------------------------------------------
// Kline interval
// ---------------------------------------------------------------------------

/// Kline width. Case matters: `1m` is a minute, `1M` a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Interval {
    Second1,
    Minute1,
    Minute3,
    Minute5,
    Minute15,
    Minute30,
    Hour1,
    Hour2,
    Hour4,
    Hour6,
    Hour8,
    Hour12,
    Day1,
    Day3,
    Week1,
    Month1,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Second1 => "1s",
            Interval::Minute1 => "1m",
            Interval::Minute3 => "3m",
            Interval::Minute5 => "5m",
            Interval::Minute15 => "15m",
            Interval::Minute30 => "30m",
            Interval::Hour1 => "1h",
            Interval::Hour2 => "2h",
            Interval::Hour4 => "4h",
            Interval::Hour6 => "6h",
            Interval::Hour8 => "8h",
            Interval::Hour12 => "12h",
            Interval::Day1 => "1d",
            Interval::Day3 => "3d",
            Interval::Week1 => "1w",
            Interval::Month1 => "1M",
        }
    }
}

impl TryFrom<String> for Interval {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        let interval = match raw.trim() {
            "1s" => Interval::Second1,
            "1m" => Interval::Minute1,
            "3m" => Interval::Minute3,
            "5m" => Interval::Minute5,
            "15m" => Interval::Minute15,
            "30m" => Interval::Minute30,
            "1h" => Interval::Hour1,
            "2h" => Interval::Hour2,
            "4h" => Interval::Hour4,
            "6h" => Interval::Hour6,
            "8h" => Interval::Hour8,
            "12h" => Interval::Hour12,
            "1d" => Interval::Day1,
            "3d" => Interval::Day3,
            "1w" => Interval::Week1,
            "1M" => Interval::Month1,
            _ => return Err(format!("unknown interval `{}`", raw)),
        };
        Ok(interval)
    }
}

// ---------------------------------------------------------------------------
// Method params
// ---------------------------------------------------------------------------

/// `get_account`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountParams {
    pub recv_window: Option<u64>,
}

impl MethodParams for AccountParams {}

/// `get_open_orders`: all symbols unless one is given.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOrdersParams {
    pub symbol: Option<Symbol>,
    pub recv_window: Option<u64>,
}

impl MethodParams for OpenOrdersParams {}

/// `get_trades`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradesParams {
    pub symbol: Symbol,
    pub limit: Option<u32>,
    pub recv_window: Option<u64>,
}

impl MethodParams for TradesParams {}

/// `place_order`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderParams {
    pub symbol: Symbol,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub quantity: Option<Decimal>,
    pub quote_order_qty: Option<Decimal>,
    pub price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
    pub time_in_force: Option<TimeInForce>,
    pub recv_window: Option<u64>,
    /// Route to the validation-only endpoint instead of placing the order.
    #[serde(default, deserialize_with = "truthy")]
    pub test: bool,
}

impl MethodParams for PlaceOrderParams {
    fn validate(&self) -> Result<(), InvalidParams> {
        if self.quantity.is_none() && self.quote_order_qty.is_none() {
            return Err(InvalidParams(
                "one of `quantity` or `quoteOrderQty` is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// `get_candles`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandlesParams {
    pub symbol: Symbol,
    pub interval: Interval,
    pub limit: Option<u32>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

impl MethodParams for CandlesParams {}

/// Loose JSON truthiness: `false`, `0`, `""`, `null` and empty containers
/// are false, everything else is true.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    })
}
