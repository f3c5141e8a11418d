//! WebSocket smoke test: a human client plays a full round against bots.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use liar_shared::{ClientMsg, Phase, PlayerAction, PlayerConfig, PlayerId, ServerMsg};
use native_liar::config::Config;
use native_liar::server::{build_router, AppState};

fn fast_config() -> Config {
    Config {
        bot_delay_min_ms: 1,
        bot_delay_max_ms: 2,
        rounds: 1,
        ..Config::default()
    }
}

async fn spawn_server() -> String {
    let state = AppState::new(fast_config(), None);
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("ws://{}/ws", addr)
}

fn test_roster() -> Vec<PlayerConfig> {
    vec![
        PlayerConfig {
            id: PlayerId(0),
            name: "Tester".into(),
            is_bot: false,
        },
        PlayerConfig {
            id: PlayerId(1),
            name: "AI_2".into(),
            is_bot: true,
        },
        PlayerConfig {
            id: PlayerId(2),
            name: "AI_3".into(),
            is_bot: true,
        },
    ]
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn full_round_over_websocket() {
    let url = spawn_server().await;
    let (ws_stream, _) = tokio_tungstenite::connect_async(&url)
        .await
        .expect("connect to server");
    let (mut write, mut read) = ws_stream.split();

    let you = PlayerId(0);
    let newgame = serde_json::to_string(&ClientMsg::NewGame {
        players: test_roster(),
    })
    .unwrap();
    write.send(Message::Text(newgame)).await.unwrap();

    let mut saw_welcome = false;
    let mut proceeded = false;
    let mut described = false;
    let mut voted = false;
    let mut guessed = false;

    let outcome = tokio::time::timeout(Duration::from_secs(30), async {
        loop {
            let Some(Ok(Message::Text(txt))) = read.next().await else {
                panic!("server closed the socket early");
            };
            let Ok(sm) = serde_json::from_str::<ServerMsg>(&txt) else {
                continue;
            };
            match sm {
                ServerMsg::Welcome { you: id } => {
                    assert_eq!(id, you);
                    saw_welcome = true;
                }
                ServerMsg::Error(e) => panic!("server error: {}", e),
                ServerMsg::Pong => {}
                ServerMsg::State(gs) => {
                    match gs.phase {
                        Phase::RoleReveal => {
                            if !proceeded {
                                proceeded = true;
                                let msg = serde_json::to_string(&ClientMsg::Proceed).unwrap();
                                write.send(Message::Text(msg)).await.unwrap();
                            }
                        }
                        Phase::Explanation => {
                            let me = gs.players.iter().find(|p| p.id == you).unwrap();
                            if gs.to_act == Some(you) && !me.has_described && !described {
                                described = true;
                                let msg = serde_json::to_string(&ClientMsg::Action {
                                    player_id: you,
                                    action: PlayerAction::Describe(
                                        "everyone has seen one of these".into(),
                                    ),
                                })
                                .unwrap();
                                write.send(Message::Text(msg)).await.unwrap();
                            }
                        }
                        Phase::Voting => {
                            let me = gs.players.iter().find(|p| p.id == you).unwrap();
                            if !me.has_voted && !voted {
                                voted = true;
                                let target = gs
                                    .players
                                    .iter()
                                    .map(|p| p.id)
                                    .find(|id| *id != you)
                                    .unwrap();
                                let msg = serde_json::to_string(&ClientMsg::Action {
                                    player_id: you,
                                    action: PlayerAction::Vote(target),
                                })
                                .unwrap();
                                write.send(Message::Text(msg)).await.unwrap();
                            }
                        }
                        Phase::Result => {
                            if gs.awaiting_guess == Some(you) {
                                if !guessed {
                                    guessed = true;
                                    let msg = serde_json::to_string(&ClientMsg::Action {
                                        player_id: you,
                                        action: PlayerAction::Guess("anything".into()),
                                    })
                                    .unwrap();
                                    write.send(Message::Text(msg)).await.unwrap();
                                }
                            } else if gs.awaiting_guess.is_none() {
                                // round fully resolved
                                return gs;
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
    })
    .await
    .expect("round should resolve within the timeout");

    assert!(saw_welcome, "server greeted the client");
    assert_eq!(outcome.phase, Phase::Result);
    assert_eq!(
        outcome.descriptions.len(),
        outcome.players.len(),
        "every player described exactly once"
    );
    // someone scored this round, whichever way the vote went
    let total: u32 = outcome.players.iter().map(|p| p.score).sum();
    assert!(total >= 1);
}
