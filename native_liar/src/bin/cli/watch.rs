use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use liar_shared::{ClientMsg, ServerMsg};

use super::utils::{DisplayMode, MessagePrinter};

/// Watch over a websocket connection and print events as they arrive.
/// Accepts an address string (e.g. "ws://host:port/ws" or "http://host:port")
/// and builds the ws URL internally.
pub async fn watch_ws(ws_addr: &str, json: bool) -> anyhow::Result<()> {
    let ws_url = super::transport::build_ws_url(ws_addr)?;
    let (ws_stream, _resp) = tokio_tungstenite::connect_async(ws_url.as_str()).await?;
    let (mut write, mut read) = ws_stream.split();

    // RequestState doubles as the reconnect handshake and subscribes this
    // socket to broadcast updates.
    let subscribe_txt = serde_json::to_string(&ClientMsg::RequestState)?;
    write.send(Message::Text(subscribe_txt)).await?;

    if json {
        eprintln!("Connected to WebSocket {}", ws_url);
    } else {
        println!("Connected to WebSocket {}", ws_url);
    }

    let mut printer = MessagePrinter::new(json, DisplayMode::Incremental);
    loop {
        match read.next().await {
            Some(Ok(Message::Text(txt))) => {
                if let Ok(sm) = serde_json::from_str::<ServerMsg>(&txt) {
                    printer.handle(&sm);
                }
            }
            Some(Ok(_other)) => { /* ignore non-text frames */ }
            Some(Err(e)) => {
                eprintln!("WebSocket error: {}", e);
                break;
            }
            None => break, // closed
        }
    }

    Ok(())
}
