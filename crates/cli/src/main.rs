use anyhow::{Context, Result};
use binrpc_api::Dispatcher;
use binrpc_brokers_binance::config::DEFAULT_BASE_URL;
use binrpc_brokers_binance::{BinanceClient, BinanceConfig, Credentials};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// Every option falls back to an environment variable, so the server runs
/// with no arguments inside a container.
#[derive(Parser)]
#[command(name = "binance-rpc")]
#[command(about = "JSON-RPC 2.0 over stdin/stdout for the Binance spot REST API")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). Logs go to stderr.
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Binance API key
    #[arg(long, env = "BINANCE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Binance API secret
    #[arg(long, env = "BINANCE_API_SECRET", hide_env_values = true)]
    api_secret: String,

    /// REST base URL (e.g. https://testnet.binance.vision)
    #[arg(long, env = "BINANCE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Default recvWindow (ms) for signed calls that do not set one
    #[arg(long, env = "BINANCE_RECV_WINDOW")]
    recv_window: Option<u64>,

    /// HTTP timeout in seconds
    #[arg(long, env = "BINANCE_TIMEOUT_SECS", default_value_t = 15)]
    timeout_secs: u64,
}

impl Cli {
    fn binance_config(&self) -> Result<BinanceConfig> {
        let credentials = Credentials::new(self.api_key.as_str(), self.api_secret.as_str())?;
        let config = BinanceConfig::new(credentials)
            .with_base_url(&self.base_url)?
            .with_recv_window(self.recv_window)
            .with_timeout_secs(self.timeout_secs);
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries the protocol, so logs must stay on stderr
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.binance_config().context("Invalid configuration")?;
    tracing::info!(
        base_url = %config.base_url,
        recv_window = ?config.recv_window,
        timeout_secs = config.timeout_secs,
        "Starting binance-rpc"
    );

    let client = BinanceClient::new(config).context("Failed to create Binance client")?;
    let dispatcher = Dispatcher::new(client);
    binrpc_api::start_stdio_server(&dispatcher)
        .await
        .context("stdio transport failed")?;

    Ok(())
}
