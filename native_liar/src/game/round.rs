//! Round initialization: role assignment, topic/word selection, turn order
//! and the eager embedding precompute.

use liar_shared::{ActionEvent, GameAction, Phase};
use rand::seq::SliceRandom;
use rand::Rng;

use super::{Game, RoundState};
use crate::inference::InferencePredictor;

impl Game {
    /// Enter RoleReveal for the current `round` value: pick exactly one liar
    /// uniformly at random, pick topic and secret word, precompute every
    /// topic's vocabulary embeddings, and fix the turn order.
    ///
    /// Embedding precompute failure is recoverable: the round proceeds, the
    /// hint is simply unavailable.
    pub(crate) fn start_round_with_rng<R: Rng>(
        &mut self,
        rng: &mut R,
        predictor: &mut InferencePredictor,
    ) {
        let n = self.players.len();

        // Exactly one liar per round.
        let liar_idx = rng.random_range(0..n);
        for (i, p) in self.players.iter_mut().enumerate() {
            p.is_liar = i == liar_idx;
        }

        let (topic, secret_word) = self.topics.choose(rng);

        // Eager precompute for every topic, once per round, so the hint costs
        // only a text embedding when a human liar needs it.
        if let Err(e) = predictor.precompute_topics(&self.topics) {
            tracing::warn!(error = %e, "vocabulary embedding precompute failed; hints unavailable this round");
        }

        let turn_order = turn_order_with_liar_not_first(rng, n, liar_idx);

        // Fresh round-scoped state; nothing survives from the previous round.
        self.round_state = RoundState {
            topic: topic.clone(),
            secret_word,
            liar_idx,
            turn_order,
            ..RoundState::default()
        };
        self.phase = Phase::RoleReveal;
        self.log(ActionEvent::game(GameAction::RoundStarted {
            round: self.round,
            topic,
        }));
        self.log(ActionEvent::game(GameAction::PhaseChanged(
            Phase::RoleReveal,
        )));
        tracing::info!(
            round = self.round,
            topic = %self.round_state.topic,
            liar = %self.players[liar_idx].name,
            "round started"
        );
    }
}

/// Random permutation of `0..n` with `liar_idx` never in first position: the
/// liar must not have to describe before hearing any context.
fn turn_order_with_liar_not_first<R: Rng>(rng: &mut R, n: usize, liar_idx: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    if n > 1 && order[0] == liar_idx {
        order.remove(0);
        let pos = rng.random_range(1..=order.len());
        order.insert(pos, liar_idx);
    }
    order
}
