use std::fmt;
use std::str::FromStr;

/// The fixed set of RPC methods this server answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Ping,
    GetAccount,
    GetOpenOrders,
    GetTrades,
    PlaceOrder,
    GetCandles,
}

impl Method {
    pub const ALL: [Method; 6] = [
        Method::Ping,
        Method::GetAccount,
        Method::GetOpenOrders,
        Method::GetTrades,
        Method::PlaceOrder,
        Method::GetCandles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Ping => "ping",
            Method::GetAccount => "get_account",
            Method::GetOpenOrders => "get_open_orders",
            Method::GetTrades => "get_trades",
            Method::PlaceOrder => "place_order",
            Method::GetCandles => "get_candles",
        }
    }

    /// Whether the method makes an HMAC-signed call.
    pub fn is_signed(&self) -> bool {
        !matches!(self, Method::Ping | Method::GetCandles)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for method in Method::ALL {
            assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
        }
    }

    #[test]
    fn test_unknown_and_case_mismatch_rejected() {
        assert_eq!(
            "bogus".parse::<Method>(),
            Err(UnknownMethod("bogus".to_string()))
        );
        assert!("PING".parse::<Method>().is_err());
    }

    #[test]
    fn test_signed_methods() {
        let signed: Vec<_> = Method::ALL.into_iter().filter(Method::is_signed).collect();
        assert_eq!(
            signed,
            vec![
                Method::GetAccount,
                Method::GetOpenOrders,
                Method::GetTrades,
                Method::PlaceOrder
            ]
        );
    }
}
