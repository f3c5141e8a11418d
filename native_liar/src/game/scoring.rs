//! Round resolution: vote tally, score awards and the liar's guess attempt.

use liar_shared::{ActionEvent, ActionKind, GameAction, Phase, PlayerId};

use super::Game;
use crate::error::GameError;

impl Game {
    /// Tally the votes, award points and enter the Result phase.
    ///
    /// Idempotent by construction: the `scored` guard makes a second call a
    /// no-op, so repeated renders can never double-award points.
    pub(crate) fn resolve_votes(&mut self) {
        if self.round_state.scored {
            return;
        }
        self.round_state.scored = true;

        let n = self.players.len();
        let mut counts = vec![0u32; n];
        let votes: Vec<(PlayerId, PlayerId)> = self
            .round_state
            .votes
            .iter()
            .map(|v| (v.voter, v.target))
            .collect();
        for (_, target) in &votes {
            if let Ok(idx) = self.index_of(*target) {
                counts[idx] += 1;
            }
        }
        let max = counts.iter().copied().max().unwrap_or(0);
        let most_accused: Vec<usize> = (0..n).filter(|&i| counts[i] == max && max > 0).collect();
        let liar_idx = self.round_state.liar_idx;
        let liar_caught = most_accused.contains(&liar_idx);
        self.round_state.most_accused = most_accused;
        self.round_state.liar_caught = liar_caught;

        self.log(ActionEvent::game(GameAction::VotesRevealed { votes }));
        self.log(ActionEvent::game(GameAction::LiarRevealed {
            liar: self.players[liar_idx].id,
            secret_word: self.round_state.secret_word.clone(),
        }));

        if liar_caught {
            let mut rewarded = Vec::new();
            for p in self.players.iter_mut() {
                if !p.is_liar {
                    p.score += 1;
                    rewarded.push(p.id);
                }
            }
            self.log(ActionEvent::game(GameAction::PointsAwarded {
                players: rewarded,
                points: 1,
            }));
            // guess attempt stays open; guess_resolved flips when it lands
        } else {
            let liar = &mut self.players[liar_idx];
            liar.score += 1;
            let liar_id = liar.id;
            self.log(ActionEvent::game(GameAction::PointsAwarded {
                players: vec![liar_id],
                points: 1,
            }));
            // escaped: no guess opportunity
            self.round_state.guess_resolved = true;
        }

        self.phase = Phase::Result;
        self.log(ActionEvent::game(GameAction::PhaseChanged(Phase::Result)));
        tracing::info!(
            liar = %self.players[liar_idx].name,
            caught = liar_caught,
            "round resolved"
        );
    }

    /// The caught liar's single guess attempt. Case-insensitive exact match
    /// earns 3 points. Runs exactly once per round; a second attempt is
    /// rejected with `DuplicateScoring`.
    pub fn submit_liar_guess(&mut self, actor: PlayerId, word: &str) -> Result<bool, GameError> {
        if self.phase != Phase::Result || !self.round_state.liar_caught {
            return Err(GameError::OutOfTurn {
                action: "submitLiarGuess",
                phase: self.phase,
            });
        }
        let idx = self.index_of(actor)?;
        if idx != self.round_state.liar_idx {
            return Err(GameError::NotYourTurn(actor));
        }
        if self.round_state.guess_resolved {
            return Err(GameError::DuplicateScoring);
        }

        let correct =
            word.trim().to_lowercase() == self.round_state.secret_word.to_lowercase();
        if correct {
            self.players[idx].score += 3;
        }
        self.round_state.guess_resolved = true;
        self.log(ActionEvent::player(
            actor,
            ActionKind::Guessed {
                word: word.trim().to_string(),
                correct,
            },
        ));
        Ok(correct)
    }
}
