//! Session operations shared by every transport.

use anyhow::{Context, Result};
use liar_shared::{
    ClientMsg, DescriptionPublic, GameStatePublic, Phase, PlayerAction, PlayerConfig, PlayerId,
    ServerMsg,
};
use std::io::IsTerminal;

use crate::bot::VoteContext;
use crate::game::Game;
use crate::pretty;
use crate::topics::TopicBook;

use super::state::{AppState, Lobby};

const NO_GAME: &str = "No active game. Please start a new game first.";

/// Unified entry point for all transports: apply the message, run the
/// follow-up work (hint, broadcast, bot driving, timer) and reply.
pub async fn handle_client_msg(state: &AppState, cm: ClientMsg) -> ServerMsg {
    match cm {
        ClientMsg::NewGame { players } => match create_new_game(state, players).await {
            Ok(()) => {
                broadcast_and_drive(state).await;
                state_reply(state).await
            }
            Err(e) => ServerMsg::Error(format!("Failed to create new game: {:#}", e)),
        },
        ClientMsg::Action { player_id, action } => {
            match apply_action(state, player_id, action).await {
                Ok(()) => {
                    broadcast_and_drive(state).await;
                    state_reply(state).await
                }
                Err(e) => ServerMsg::Error(e),
            }
        }
        ClientMsg::Proceed => match proceed(state).await {
            Ok(()) => {
                broadcast_and_drive(state).await;
                state_reply(state).await
            }
            Err(e) => ServerMsg::Error(e),
        },
        ClientMsg::NextAiTurn => {
            if super::bot_driver::ai_describe_once(state).await {
                ensure_hint(state).await;
                broadcast_state(state).await;
                super::turn_timer::arm_turn_timer(state).await;
                state_reply(state).await
            } else {
                ServerMsg::Error("No AI description turn is pending.".into())
            }
        }
        ClientMsg::NextRound => match next_round(state).await {
            Ok(()) => {
                broadcast_and_drive(state).await;
                state_reply(state).await
            }
            Err(e) => ServerMsg::Error(e),
        },
        ClientMsg::RequestState => state_reply(state).await,
        ClientMsg::Ping => ServerMsg::Pong,
    }
}

async fn state_reply(state: &AppState) -> ServerMsg {
    match current_state_public(state).await {
        Some(gs) => ServerMsg::State(gs),
        None => ServerMsg::Error(NO_GAME.into()),
    }
}

/// Create a new session with the specified players and start round 1.
pub async fn create_new_game(state: &AppState, players: Vec<PlayerConfig>) -> Result<()> {
    let (rounds, topics) = {
        let cfg = state.config.read().await;
        let topics = match &cfg.topics_file {
            Some(path) => TopicBook::from_toml_file(path).context("loading topics file")?,
            None => TopicBook::builtin(),
        };
        (cfg.rounds, topics)
    };

    let mut guard = state.lobby.write().await;
    let lobby = &mut *guard;
    let player_count = players.len();

    // The engine's Player type is agnostic about bot status; the backend
    // tracks bot-driven ids separately.
    let bot_ids: Vec<PlayerId> = players.iter().filter(|c| c.is_bot).map(|c| c.id).collect();

    let mut game = Game::with_players(players, topics, rounds)
        .context("creating new game with specified players")?;
    tokio::task::block_in_place(|| game.start_game(&mut lobby.predictor))
        .context("starting round 1")?;

    lobby.bots = bot_ids;
    lobby.game = Some(game);
    lobby.last_printed_log_len = 0;
    lobby.turn_epoch += 1;
    tracing::info!(player_count, "created new game");
    Ok(())
}

/// Validate and apply a player action. Errors are surfaced as user-visible
/// strings; the session state is unchanged on failure.
pub async fn apply_action(
    state: &AppState,
    player_id: PlayerId,
    action: PlayerAction,
) -> Result<(), String> {
    let mut guard = state.lobby.write().await;
    let lobby = &mut *guard;
    if lobby.game.is_none() {
        return Err(NO_GAME.into());
    }

    match action {
        PlayerAction::Describe(text) => {
            if let Some(game) = lobby.game.as_mut() {
                game.submit_description(player_id, &text)
                    .map_err(|e| e.to_string())?;
            }
        }
        PlayerAction::Vote(target) => {
            if let Some(game) = lobby.game.as_mut() {
                game.submit_vote(player_id, target)
                    .map_err(|e| e.to_string())?;
            }
            // the human vote is in; every AI vote follows in the same batch,
            // against the same description set, under the same lock
            cast_bot_votes(lobby);
        }
        PlayerAction::Guess(word) => {
            if let Some(game) = lobby.game.as_mut() {
                game.submit_liar_guess(player_id, &word)
                    .map_err(|e| e.to_string())?;
            }
        }
    }
    lobby.turn_epoch += 1;
    Ok(())
}

/// Generate and apply all outstanding AI votes against the current
/// description set.
fn cast_bot_votes(lobby: &mut Lobby) {
    let Some(game) = lobby.game.as_mut() else {
        return;
    };
    if game.phase != Phase::Voting {
        return;
    }
    let descriptions: Vec<DescriptionPublic> = game
        .round_state
        .descriptions
        .iter()
        .map(|d| DescriptionPublic {
            player_id: d.player,
            text: d.text.clone(),
        })
        .collect();
    let pending: Vec<PlayerId> = game
        .players
        .iter()
        .map(|p| p.id)
        .filter(|id| lobby.bots.contains(id) && !game.has_voted(*id))
        .collect();

    for voter in pending {
        if game.phase != Phase::Voting {
            break;
        }
        let ctx = VoteContext {
            voter,
            descriptions: &descriptions,
        };
        let target =
            tokio::task::block_in_place(|| lobby.bot_manager.cast_vote(&ctx, &lobby.predictor));
        if let Err(e) = game.submit_vote(voter, target) {
            tracing::error!(error = %e, %voter, "bot vote rejected");
        }
    }
}

async fn proceed(state: &AppState) -> Result<(), String> {
    let mut guard = state.lobby.write().await;
    let lobby = &mut *guard;
    let Some(game) = lobby.game.as_mut() else {
        return Err(NO_GAME.into());
    };
    game.proceed_to_explanation().map_err(|e| e.to_string())?;
    lobby.turn_epoch += 1;
    Ok(())
}

async fn next_round(state: &AppState) -> Result<(), String> {
    let mut guard = state.lobby.write().await;
    let lobby = &mut *guard;
    let Some(game) = lobby.game.as_mut() else {
        return Err(NO_GAME.into());
    };
    tokio::task::block_in_place(|| game.next_round(&mut lobby.predictor))
        .map_err(|e| e.to_string())?;
    lobby.turn_epoch += 1;
    Ok(())
}

/// Compute the human liar's hint when their turn is up. Failure is
/// recoverable: the round continues, the hint stays unavailable.
pub(crate) async fn ensure_hint(state: &AppState) {
    let mut guard = state.lobby.write().await;
    let lobby = &mut *guard;
    if let Some(game) = lobby.game.as_mut() {
        let res = tokio::task::block_in_place(|| game.ensure_liar_hint(&lobby.predictor));
        match res {
            Ok(true) => tracing::info!("liar hint ready"),
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(error = %e, "hint computation failed; continuing without a hint")
            }
        }
    }
}

/// The human player's view of the session.
pub async fn current_state_public(state: &AppState) -> Option<GameStatePublic> {
    let lobby = state.lobby.read().await;
    let viewer = lobby.human_id()?;
    lobby.game.as_ref().map(|g| g.public_for(viewer))
}

/// Broadcast the current state (and print new events to the server console)
/// to all subscribers. Transports re-personalize per connection.
pub async fn broadcast_state(state: &AppState) {
    if let Some(gs) = current_state_public(state).await {
        let mut lobby = state.lobby.write().await;
        let already = lobby.last_printed_log_len;
        let total = gs.action_log.len();
        if total > already {
            for e in gs.action_log.iter().skip(already) {
                let line =
                    pretty::format_event_human(e, &gs.players, std::io::stdout().is_terminal());
                tracing::info!("{}", line);
            }
            lobby.last_printed_log_len = total;
        }
        drop(lobby);

        let _ = state.broadcaster.send(ServerMsg::State(gs));
    }
}

/// Broadcast, then run every follow-up the new state calls for: the human
/// liar's hint, pending AI turns, and the human turn deadline.
pub async fn broadcast_and_drive(state: &AppState) {
    ensure_hint(state).await;
    broadcast_state(state).await;
    let (min_ms, max_ms) = { state.config.read().await.bot_delay_range() };
    super::bot_driver::drive_bots_with_delays(state, min_ms, max_ms).await;
    super::turn_timer::arm_turn_timer(state).await;
}
