//! Binance spot exchange adapter.
//!
//! Direct REST integration: account, open orders, trade history and order
//! placement are HMAC-signed; klines are public.

pub mod client;
pub mod config;
pub mod signing;

pub use client::BinanceClient;
pub use config::{BinanceConfig, ConfigError, Credentials};
