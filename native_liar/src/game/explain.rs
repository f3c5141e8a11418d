//! Explanation phase: description turns, the human-liar hint and the
//! turn-timeout fast path.

use liar_shared::{ActionEvent, ActionKind, GameAction, Phase, PlayerId};

use super::{Description, Game, Vote};
use crate::error::GameError;
use crate::inference::{EmbedError, InferencePredictor};

impl Game {
    /// Leave RoleReveal and begin the description turns.
    pub fn proceed_to_explanation(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::RoleReveal {
            return Err(GameError::OutOfTurn {
                action: "proceedToExplanation",
                phase: self.phase,
            });
        }
        self.phase = Phase::Explanation;
        self.log(ActionEvent::game(GameAction::PhaseChanged(
            Phase::Explanation,
        )));
        Ok(())
    }

    /// Accept one description from the player whose turn it is. Advances the
    /// turn and flips to Voting after the last describer.
    pub fn submit_description(&mut self, actor: PlayerId, text: &str) -> Result<(), GameError> {
        if self.phase != Phase::Explanation {
            return Err(GameError::OutOfTurn {
                action: "submitDescription",
                phase: self.phase,
            });
        }
        let idx = self.index_of(actor)?;
        let current = self.round_state.turn_order[self.round_state.turn_cursor];
        if idx != current {
            return Err(GameError::NotYourTurn(actor));
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            // re-prompt; the turn does not advance
            return Err(GameError::EmptyDescription);
        }

        self.round_state.descriptions.push(Description {
            player: actor,
            text: trimmed.to_string(),
        });
        self.log(ActionEvent::player(
            actor,
            ActionKind::Described(trimmed.to_string()),
        ));

        self.round_state.turn_cursor += 1;
        if self.round_state.turn_cursor >= self.players.len() {
            self.phase = Phase::Voting;
            self.log(ActionEvent::game(GameAction::PhaseChanged(Phase::Voting)));
        }
        Ok(())
    }

    /// Compute the predictor hint for a human liar, at most once per round.
    ///
    /// Returns `Ok(true)` when a hint was computed on this call; `Ok(false)`
    /// when the conditions do not apply or the hint is already cached
    /// (idempotent across repeated renders).
    pub fn ensure_liar_hint(
        &mut self,
        predictor: &InferencePredictor,
    ) -> Result<bool, EmbedError> {
        if self.phase != Phase::Explanation || self.round_state.hint.is_some() {
            return Ok(false);
        }
        let rs = &self.round_state;
        if !self.players[rs.liar_idx].is_human {
            return Ok(false);
        }
        // computed right before the liar's own turn
        if rs.turn_order.get(rs.turn_cursor) != Some(&rs.liar_idx) {
            return Ok(false);
        }
        let aggregated = super::utils::aggregate_descriptions(self);
        let ranked = predictor.rank_topic(&aggregated, &self.round_state.topic)?;
        self.round_state.hint = Some(ranked);
        tracing::debug!(round = self.round, "liar hint computed");
        Ok(true)
    }

    /// Fast-fail path for an unresponsive player: every other player is
    /// forced to accuse them, remaining description turns are skipped, and
    /// the round resolves through the normal Result logic.
    pub fn timeout_current_turn(&mut self) -> Result<PlayerId, GameError> {
        if self.phase != Phase::Explanation {
            return Err(GameError::OutOfTurn {
                action: "turnTimeout",
                phase: self.phase,
            });
        }
        let accused_idx = self.round_state.turn_order[self.round_state.turn_cursor];
        let accused = self.players[accused_idx].id;
        self.log(ActionEvent::player(accused, ActionKind::TimedOut));

        let votes: Vec<Vote> = self
            .players
            .iter()
            .filter(|p| p.id != accused)
            .map(|p| Vote {
                voter: p.id,
                target: accused,
            })
            .collect();
        self.round_state.votes = votes;
        self.phase = Phase::Voting;
        self.log(ActionEvent::game(GameAction::PhaseChanged(Phase::Voting)));
        tracing::info!(player = %self.players[accused_idx].name, "turn timed out, auto-accused");

        self.resolve_votes();
        Ok(accused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::utils::test_support::{drive_descriptions, fresh_game};

    #[test]
    fn descriptions_follow_turn_order_only() {
        let (mut game, _) = fresh_game(3, 5);
        game.proceed_to_explanation().unwrap();
        let order = game.round_state.turn_order.clone();
        let wrong = game.players[order[1]].id;
        assert_eq!(
            game.submit_description(wrong, "me first"),
            Err(GameError::NotYourTurn(wrong))
        );
        let right = game.players[order[0]].id;
        game.submit_description(right, "a fine thing").unwrap();
        assert_eq!(game.round_state.turn_cursor, 1);
    }

    #[test]
    fn empty_description_rejected_without_advancing() {
        let (mut game, _) = fresh_game(3, 5);
        game.proceed_to_explanation().unwrap();
        let first = game.players[game.round_state.turn_order[0]].id;
        assert_eq!(
            game.submit_description(first, "   "),
            Err(GameError::EmptyDescription)
        );
        assert_eq!(game.round_state.turn_cursor, 0);
        assert!(game.round_state.descriptions.is_empty());
    }

    #[test]
    fn one_description_per_player_then_voting() {
        let (mut game, _) = fresh_game(4, 9);
        game.proceed_to_explanation().unwrap();
        drive_descriptions(&mut game);
        assert_eq!(game.phase, Phase::Voting);
        assert_eq!(game.round_state.descriptions.len(), game.players.len());
        // one entry per unique player
        for p in &game.players {
            let count = game
                .round_state
                .descriptions
                .iter()
                .filter(|d| d.player == p.id)
                .count();
            assert_eq!(count, 1);
        }
    }

    #[test]
    fn describing_before_role_reveal_exit_is_out_of_turn() {
        let (mut game, _) = fresh_game(3, 1);
        let first = game.players[game.round_state.turn_order[0]].id;
        assert!(matches!(
            game.submit_description(first, "too early"),
            Err(GameError::OutOfTurn { .. })
        ));
    }

    #[test]
    fn hint_computed_once_and_cached() {
        // find a seed where the human (index 0) is the liar
        for seed in 0..500u64 {
            let (mut game, predictor) = fresh_game(3, seed);
            if !game.players[game.round_state.liar_idx].is_human {
                continue;
            }
            game.proceed_to_explanation().unwrap();
            // play turns until the liar is up
            while game.round_state.turn_order[game.round_state.turn_cursor]
                != game.round_state.liar_idx
            {
                let id = game.players[game.round_state.turn_order[game.round_state.turn_cursor]].id;
                game.submit_description(id, "something vague and wordy").unwrap();
            }
            assert!(game.ensure_liar_hint(&predictor).unwrap());
            let first = game.round_state.hint.clone().unwrap();
            assert!(!first.is_empty());
            // second render: cached, not recomputed
            assert!(!game.ensure_liar_hint(&predictor).unwrap());
            assert_eq!(game.round_state.hint.clone().unwrap(), first);
            return;
        }
        panic!("no seed produced a human liar");
    }

    #[test]
    fn timeout_short_circuits_to_result() {
        let (mut game, _) = fresh_game(4, 21);
        game.proceed_to_explanation().unwrap();
        let accused = game
            .timeout_current_turn()
            .expect("timeout applies during explanation");
        assert_eq!(game.phase, Phase::Result);
        // every other player voted against the accused
        assert_eq!(game.round_state.votes.len(), game.players.len() - 1);
        assert!(game
            .round_state
            .votes
            .iter()
            .all(|v| v.target == accused && v.voter != accused));
        assert!(game.round_state.scored);
    }
}
