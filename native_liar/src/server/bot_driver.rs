//! Drives pending AI turns: description turns during Explanation and the
//! liar's guess during Result. AI votes are not handled here; they are cast
//! as one batch right after the human vote (see `game_ops`).

use std::time::Duration;

use liar_shared::Phase;

use crate::bot::DescribeContext;

use super::state::{AppState, Lobby};

enum PendingBot {
    Describe,
    Guess,
}

/// Process pending bot actions one at a time, broadcasting after each so
/// clients watch the game unfold instead of receiving it finished.
pub async fn drive_bots_with_delays(state: &AppState, min_ms: u64, max_ms: u64) {
    // Ensure only one drive loop runs at a time.
    {
        let mut lobby = state.lobby.write().await;
        if lobby.driving {
            return;
        }
        lobby.driving = true;
    }

    loop {
        let pending = {
            let lobby = state.lobby.read().await;
            pending_bot_action(&lobby)
        };
        let Some(kind) = pending else { break };

        let ok = match kind {
            PendingBot::Describe => process_bot_description(state).await,
            PendingBot::Guess => process_bot_guess(state).await,
        };

        super::game_ops::ensure_hint(state).await;
        super::game_ops::broadcast_state(state).await;

        if !ok {
            break;
        }

        // jittered, human-feeling delay before the next bot action
        let now_ns = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos() as u64)
            .unwrap_or(0);
        let span = max_ms.saturating_sub(min_ms);
        let delay = min_ms + now_ns % span.max(1);
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    {
        let mut lobby = state.lobby.write().await;
        lobby.driving = false;
    }
}

/// Drive exactly one pending AI description turn (the `NextAiTurn` action).
pub(crate) async fn ai_describe_once(state: &AppState) -> bool {
    let is_describe = {
        let lobby = state.lobby.read().await;
        matches!(pending_bot_action(&lobby), Some(PendingBot::Describe))
    };
    if !is_describe {
        return false;
    }
    process_bot_description(state).await
}

fn pending_bot_action(lobby: &Lobby) -> Option<PendingBot> {
    let game = lobby.game.as_ref()?;
    let actor = game.to_act()?;
    if !lobby.is_bot(actor) {
        return None;
    }
    match game.phase {
        Phase::Explanation => Some(PendingBot::Describe),
        Phase::Result => Some(PendingBot::Guess),
        _ => None,
    }
}

async fn process_bot_description(state: &AppState) -> bool {
    let mut guard = state.lobby.write().await;
    let lobby = &mut *guard;
    let Some(game) = lobby.game.as_mut() else {
        return false;
    };
    if game.phase != Phase::Explanation {
        return false;
    }
    let Some(actor) = game.to_act() else {
        return false;
    };
    if !lobby.bots.contains(&actor) {
        return false;
    }
    let Some(actor_idx) = game.players.iter().position(|p| p.id == actor) else {
        return false;
    };

    let is_liar = game.players[actor_idx].is_liar;
    let prior = game.aggregated_descriptions();
    let topic = game.round_state.topic.clone();
    // the bot liar never receives the secret word
    let secret = (!is_liar).then(|| game.round_state.secret_word.clone());
    let ctx = DescribeContext {
        topic: &topic,
        secret_word: secret.as_deref(),
        prior_text: &prior,
        position: game.round_state.turn_cursor,
    };
    let text =
        tokio::task::block_in_place(|| lobby.bot_manager.compose_description(&ctx, &lobby.predictor));

    match game.submit_description(actor, &text) {
        Ok(()) => {
            lobby.turn_epoch += 1;
            tracing::debug!(%actor, "bot described");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, %actor, "bot failed to describe");
            false
        }
    }
}

async fn process_bot_guess(state: &AppState) -> bool {
    let mut guard = state.lobby.write().await;
    let lobby = &mut *guard;
    let Some(game) = lobby.game.as_mut() else {
        return false;
    };
    if game.phase != Phase::Result {
        return false;
    }
    let Some(actor) = game.to_act() else {
        return false;
    };
    if !lobby.bots.contains(&actor) {
        return false;
    }

    let aggregated = game.aggregated_descriptions();
    let topic = game.round_state.topic.clone();
    let guess = tokio::task::block_in_place(|| {
        lobby
            .bot_manager
            .guess_secret(&topic, &aggregated, &lobby.predictor)
    });
    // no ranking available: submit a blank guess so the attempt resolves
    let word = guess.unwrap_or_default();

    match game.submit_liar_guess(actor, &word) {
        Ok(correct) => {
            lobby.turn_epoch += 1;
            tracing::info!(%actor, correct, "bot liar guessed");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, %actor, "bot guess rejected");
            false
        }
    }
}
