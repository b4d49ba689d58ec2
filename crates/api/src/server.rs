use binrpc_core::{ErrorObject, Exchange, Id, Response};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use crate::dispatcher::Dispatcher;

/// Read newline-delimited requests from `reader` and write one response
/// line per request to `writer`, flushing after each.
///
/// Lines are handled strictly in order; the next line is not read until the
/// current one has been answered. Returns when `reader` reaches EOF.
pub async fn serve<E, R, W>(dispatcher: &Dispatcher<E>, mut reader: R, mut writer: W) -> std::io::Result<()>
where
    E: Exchange,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut handled = 0u64;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        // Bytes that are not UTF-8 cannot be JSON
        let response = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                handled += 1;
                match dispatcher.handle_line(line).await {
                    Some(response) => response,
                    None => {
                        debug!("Notification handled, no response");
                        continue;
                    }
                }
            }
            Err(e) => {
                handled += 1;
                warn!(error = %e, "Input line is not valid UTF-8");
                Response::error(Id::Null, ErrorObject::parse_error())
            }
        };

        let encoded = match serde_json::to_string(&response) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!(error = %e, "Failed to serialize response");
                serde_json::to_string(&Response::error(response.id, ErrorObject::internal_error()))?
            }
        };

        writer.write_all(encoded.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    info!(handled, "Input closed, shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubExchange;
    use binrpc_core::{code, Outcome};

    async fn run(input: &str) -> (Vec<Response>, Dispatcher<StubExchange>) {
        run_bytes(input.as_bytes()).await
    }

    async fn run_bytes(input: &[u8]) -> (Vec<Response>, Dispatcher<StubExchange>) {
        let dispatcher = Dispatcher::new(StubExchange::new());
        let mut output = Vec::new();
        serve(&dispatcher, input, &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.is_empty() || text.ends_with('\n'));
        let responses: Vec<Response> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (responses, dispatcher)
    }

    #[tokio::test]
    async fn test_one_line_out_per_request() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"bogus","params":{}}"#,
            "\n",
            "this is not json\n",
            r#"{"jsonrpc":"2.0","id":"t","method":"get_trades","params":{"symbol":"BTCUSDT"}}"#,
            "\n",
        );
        let (responses, dispatcher) = run(input).await;

        assert_eq!(responses.len(), 4);
        assert_eq!(responses[0].id, Id::from(1));
        assert!(!responses[0].is_error());
        assert_eq!(responses[1].id, Id::from(2));
        assert_eq!(responses[2].id, Id::Null);
        assert_eq!(responses[3].id, Id::from("t"));
        assert_eq!(dispatcher.exchange().calls(), vec!["trades BTCUSDT"]);

        match &responses[1].outcome {
            Outcome::Error(e) => assert_eq!(e.code, code::METHOD_NOT_FOUND),
            other => panic!("Expected error, got {:?}", other),
        }
        match &responses[2].outcome {
            Outcome::Error(e) => assert_eq!(e.code, code::PARSE_ERROR),
            other => panic!("Expected error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blank_lines_and_notifications_are_silent() {
        let input = concat!(
            "\n",
            "   \n",
            r#"{"jsonrpc":"2.0","method":"get_account"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":3,"method":"ping"}"#,
            "\r\n",
        );
        let (responses, dispatcher) = run(input).await;

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].id, Id::from(3));
        assert_eq!(dispatcher.exchange().calls(), vec!["account"]);
    }

    #[tokio::test]
    async fn test_last_line_without_newline() {
        let (responses, _) = run(r#"{"jsonrpc":"2.0","id":4,"method":"ping"}"#).await;
        assert_eq!(responses.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let (responses, _) = run("").await;
        assert!(responses.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_is_parse_error() {
        let mut input = b"\xff\xfe garbage\n".to_vec();
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":5,"method":"ping"}"#);
        input.push(b'\n');
        let (responses, _) = run_bytes(&input).await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].id, Id::Null);
        match &responses[0].outcome {
            Outcome::Error(e) => assert_eq!(e.code, code::PARSE_ERROR),
            other => panic!("Expected error, got {:?}", other),
        }
        assert_eq!(responses[1].id, Id::from(5));
        assert!(!responses[1].is_error());
    }
}
