//! Phase/round transitions: advancing rounds and ending the game.

use liar_shared::{ActionEvent, GameAction, Phase};

use super::Game;
use crate::error::GameError;
use crate::inference::InferencePredictor;

impl Game {
    /// Leave the Result phase: reset round-scoped state and either start the
    /// next round or finish the game.
    ///
    /// Rejected while a caught liar's guess attempt is still open; the guess
    /// step runs exactly once per round and cannot be skipped.
    pub fn next_round(&mut self, predictor: &mut InferencePredictor) -> Result<(), GameError> {
        self.next_round_with_rng(&mut rand::rng(), predictor)
    }

    pub fn next_round_with_rng<R: rand::Rng>(
        &mut self,
        rng: &mut R,
        predictor: &mut InferencePredictor,
    ) -> Result<(), GameError> {
        if self.phase != Phase::Result {
            return Err(GameError::OutOfTurn {
                action: "nextRound",
                phase: self.phase,
            });
        }
        if self.round_state.liar_caught && !self.round_state.guess_resolved {
            return Err(GameError::OutOfTurn {
                action: "nextRound (liar guess pending)",
                phase: self.phase,
            });
        }

        self.round += 1;
        if self.round <= self.total_rounds {
            self.start_round_with_rng(rng, predictor);
        } else {
            self.finish_game();
        }
        Ok(())
    }

    fn finish_game(&mut self) {
        self.phase = Phase::GameOver;
        let max = self.players.iter().map(|p| p.score).max().unwrap_or(0);
        self.winner_ids = self
            .players
            .iter()
            .filter(|p| p.score == max)
            .map(|p| p.id)
            .collect();
        self.log(ActionEvent::game(GameAction::GameOver {
            winners: self.winner_ids.clone(),
        }));
        tracing::info!(winners = ?self.winner_ids, "game over");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::utils::test_support::{fresh_game, resolve_round_with_liar_escape};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rounds_increment_strictly_then_game_over() {
        let (mut game, mut predictor) = fresh_game(3, 30);
        let mut rng = StdRng::seed_from_u64(99);
        assert_eq!(game.total_rounds, 3);
        for expected in 1..=3u32 {
            assert_eq!(game.round, expected);
            resolve_round_with_liar_escape(&mut game);
            assert_eq!(game.phase, Phase::Result);
            game.next_round_with_rng(&mut rng, &mut predictor).unwrap();
        }
        assert_eq!(game.phase, Phase::GameOver);
    }

    #[test]
    fn next_round_outside_result_is_rejected() {
        let (mut game, mut predictor) = fresh_game(3, 31);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            game.next_round_with_rng(&mut rng, &mut predictor),
            Err(GameError::OutOfTurn { .. })
        ));
    }

    #[test]
    fn tied_winners_are_reported_jointly() {
        let (mut game, mut predictor) = fresh_game(3, 32);
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..3 {
            resolve_round_with_liar_escape(&mut game);
            game.next_round_with_rng(&mut rng, &mut predictor).unwrap();
        }
        assert_eq!(game.phase, Phase::GameOver);
        // force a two-way tie at the top and recompute
        game.phase = Phase::Result;
        game.round_state.liar_caught = false;
        game.round_state.guess_resolved = true;
        game.players[0].score = 5;
        game.players[1].score = 5;
        game.players[2].score = 2;
        game.round = game.total_rounds; // next_round pushes past the end
        game.next_round_with_rng(&mut rng, &mut predictor).unwrap();
        assert_eq!(game.phase, Phase::GameOver);
        let winners = game.winner_ids.clone();
        assert_eq!(winners.len(), 2);
        assert!(winners.contains(&game.players[0].id));
        assert!(winners.contains(&game.players[1].id));
    }

    #[test]
    fn scores_never_decrease_across_rounds() {
        let (mut game, mut predictor) = fresh_game(4, 33);
        let mut rng = StdRng::seed_from_u64(3);
        let mut prev: Vec<u32> = game.players.iter().map(|p| p.score).collect();
        for _ in 0..game.total_rounds {
            resolve_round_with_liar_escape(&mut game);
            let now: Vec<u32> = game.players.iter().map(|p| p.score).collect();
            for (a, b) in prev.iter().zip(now.iter()) {
                assert!(b >= a);
            }
            prev = now;
            game.next_round_with_rng(&mut rng, &mut predictor).unwrap();
        }
    }
}
