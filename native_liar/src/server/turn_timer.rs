//! Wall-clock deadline for human description turns.
//!
//! A timer is bound to a single turn via the lobby's epoch counter: every
//! successful mutation bumps the epoch, so a timer armed for an earlier turn
//! finds a mismatch and does nothing. Cancellation needs no extra plumbing.

use std::time::Duration;

use liar_shared::Phase;

use super::state::AppState;

/// Arm a deadline for the current turn if it belongs to a human and a
/// timeout is configured. On expiry the player is auto-accused and the round
/// resolves through the normal Result path.
pub async fn arm_turn_timer(state: &AppState) {
    let timeout_secs = { state.config.read().await.turn_timeout_secs };
    let Some(secs) = timeout_secs else { return };

    let (epoch, token) = {
        let lobby = state.lobby.read().await;
        let Some(game) = lobby.game.as_ref() else {
            return;
        };
        if game.phase != Phase::Explanation {
            return;
        }
        let Some(id) = game.to_act() else { return };
        if lobby.is_bot(id) {
            return;
        }
        (lobby.turn_epoch, game.turn_token())
    };

    let state = state.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(secs)).await;

        let fired = {
            let mut guard = state.lobby.write().await;
            let lobby = &mut *guard;
            if lobby.turn_epoch != epoch {
                false // the turn moved on; timer is stale
            } else if let Some(game) = lobby.game.as_mut() {
                if game.phase == Phase::Explanation && game.turn_token() == token {
                    match game.timeout_current_turn() {
                        Ok(accused) => {
                            lobby.turn_epoch += 1;
                            tracing::info!(%accused, "turn deadline expired; auto-accused");
                            true
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "timeout transition failed");
                            false
                        }
                    }
                } else {
                    false
                }
            } else {
                false
            }
        };

        if fired {
            // the round resolved; a bot liar may still owe a guess
            super::game_ops::ensure_hint(&state).await;
            super::game_ops::broadcast_state(&state).await;
            let (min_ms, max_ms) = { state.config.read().await.bot_delay_range() };
            super::bot_driver::drive_bots_with_delays(&state, min_ms, max_ms).await;
        }
    });
}
