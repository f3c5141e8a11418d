// WebSocket handlers and websocket-specific helpers.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::StreamExt;
use tokio::sync::broadcast;

use liar_shared::{ClientMsg, ServerMsg};

use super::state::AppState;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    // The first message doubles as the handshake: usually NewGame, but a
    // reconnecting or one-shot client may open with any action.
    let first_reply = match socket.next().await {
        Some(Ok(Message::Text(t))) => match serde_json::from_str::<ClientMsg>(&t) {
            Ok(cm) => super::game_ops::handle_client_msg(&state, cm).await,
            Err(_) => {
                send_ws(
                    &mut socket,
                    &ServerMsg::Error("Malformed ClientMsg JSON".into()),
                )
                .await;
                return;
            }
        },
        _ => return,
    };

    let you = { state.lobby.read().await.human_id() };
    let Some(you) = you else {
        send_ws(&mut socket, &first_reply).await;
        return;
    };
    tracing::info!(%you, "client connected");

    send_ws(&mut socket, &ServerMsg::Welcome { you }).await;
    send_ws(&mut socket, &first_reply).await;

    // Subscribe to broadcasts so this socket receives state updates produced
    // by bot driving and timers.
    let mut rx = state.broadcaster.subscribe();

    loop {
        tokio::select! {
            biased;

            recv = rx.recv() => {
                match recv {
                    Ok(sm) => match sm {
                        ServerMsg::State(_) => {
                            // Re-send a viewer-specific state to this socket so
                            // secret-word visibility is right for this client.
                            send_state_to(&mut socket, &state).await;
                        }
                        other => {
                            send_ws(&mut socket, &other).await;
                        }
                    },
                    Err(broadcast::error::RecvError::Lagged(_)) => {
                        // We missed messages; catch up on the next send.
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg = socket.next() => {
                match msg {
                    Some(Ok(Message::Text(txt))) => {
                        match serde_json::from_str::<ClientMsg>(&txt) {
                            Ok(cm) => {
                                let resp = super::game_ops::handle_client_msg(&state, cm).await;
                                send_ws(&mut socket, &resp).await;
                            }
                            Err(_) => {
                                tracing::warn!(raw = %txt, "malformed ClientMsg JSON");
                                send_ws(&mut socket, &ServerMsg::Error("Malformed ClientMsg JSON".into())).await;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        }
    }
    tracing::info!(%you, "client disconnected");
}

async fn send_ws(socket: &mut WebSocket, msg: &ServerMsg) {
    match serde_json::to_string(msg) {
        Ok(txt) => {
            let _ = socket.send(Message::Text(txt)).await;
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize ServerMsg for websocket send");
        }
    }
}

async fn send_state_to(socket: &mut WebSocket, state: &AppState) {
    if let Some(gs) = super::game_ops::current_state_public(state).await {
        send_ws(socket, &ServerMsg::State(gs)).await;
    }
}
