use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use liar_shared::{ClientMsg, ServerMsg};

use super::utils::MessagePrinter;

/// Try to build a websocket URL from a base string (like
/// "ws://host:3000/ws" or "http://host:3000").
pub fn build_ws_url(base: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(base).or_else(|_| Url::parse(&format!("http://{}", base)))?;

    match url.scheme() {
        "http" => url.set_scheme("ws").ok(),
        "https" => url.set_scheme("wss").ok(),
        "ws" | "wss" => Some(()),
        _ => None,
    }
    .ok_or_else(|| anyhow::anyhow!("Unsupported URL scheme: {}", url.scheme()))?;

    // Force path to /ws
    if url.path() != "/ws" {
        url.set_path("/ws");
    }
    Ok(url)
}

/// Connect over websocket, send the provided ClientMsg and pass all
/// responses to the printer until timeout.
pub async fn run_once_ws(
    ws_addr: &str,
    client_msg: ClientMsg,
    wait_ms: u64,
    printer: &mut MessagePrinter,
) -> anyhow::Result<()> {
    let ws_url = build_ws_url(ws_addr)?;
    let (ws_stream, _resp) = tokio_tungstenite::connect_async(ws_url.as_str()).await?;
    let (mut write, mut read) = ws_stream.split();

    {
        let txt = serde_json::to_string(&client_msg)?;
        write.send(Message::Text(txt)).await?;
    }

    // Read until timeout, forwarding all server messages
    loop {
        match tokio::time::timeout(Duration::from_millis(wait_ms), read.next()).await {
            Ok(Some(Ok(Message::Text(txt)))) => {
                if let Ok(sm) = serde_json::from_str::<ServerMsg>(&txt) {
                    printer.handle(&sm);
                }
            }
            Ok(Some(Ok(_other))) => { /* ignore */ }
            Ok(Some(Err(e))) => {
                eprintln!("WebSocket error: {}", e);
                break;
            }
            Ok(None) => break, // socket closed
            Err(_) => break,   // timeout
        }
    }

    Ok(())
}

/// Run a single HTTP call against the unified message endpoint and forward
/// the response to the printer.
pub async fn run_once_http(
    base: &str,
    client_msg: ClientMsg,
    wait_ms: u64,
    printer: &mut MessagePrinter,
) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let url = format!("{}/api/message", base);

    let response = tokio::time::timeout(Duration::from_millis(wait_ms), async {
        client.post(&url).json(&client_msg).send().await
    })
    .await??;

    let server_msg: ServerMsg = response.json().await?;
    printer.handle(&server_msg);

    Ok(())
}
