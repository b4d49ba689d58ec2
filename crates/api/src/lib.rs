pub mod dispatcher;
pub mod error;
pub mod methods;
pub mod server;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatcher::Dispatcher;
pub use methods::Method;
pub use server::serve;

use binrpc_core::Exchange;
use tokio::io::BufReader;

/// Serve JSON-RPC on the process stdin/stdout until stdin closes.
pub async fn start_stdio_server<E: Exchange>(dispatcher: &Dispatcher<E>) -> std::io::Result<()> {
    tracing::info!("JSON-RPC server reading from stdin");
    serve(dispatcher, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}
