//! Small helpers shared across the game modules.

use super::Game;

/// Keep the in-memory event log bounded.
pub(crate) fn cap_logs(g: &mut Game) {
    let len = g.recent_actions.len();
    if len > super::engine::MAX_RECENT_ACTIONS {
        g.recent_actions
            .drain(0..len - super::engine::MAX_RECENT_ACTIONS);
    }
}

/// Concatenate all descriptions so far, in speaking order. This is the
/// predictor's query text; it grows monotonically across a round.
pub(crate) fn aggregate_descriptions(g: &Game) -> String {
    g.round_state
        .descriptions
        .iter()
        .map(|d| d.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
pub(crate) mod test_support {
    use liar_shared::{Phase, PlayerConfig, PlayerId};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::game::{Game, RoundState};
    use crate::inference::InferencePredictor;
    use crate::topics::TopicBook;

    pub(crate) fn configs(roster: &[(&str, bool)]) -> Vec<PlayerConfig> {
        roster
            .iter()
            .enumerate()
            .map(|(i, (name, is_bot))| PlayerConfig {
                id: PlayerId(i),
                name: name.to_string(),
                is_bot: *is_bot,
            })
            .collect()
    }

    /// A started 3+-player game (Alice human, AI_i bots) with a seeded rng
    /// and a default hash-embedding predictor.
    pub(crate) fn fresh_game(n: usize, seed: u64) -> (Game, InferencePredictor) {
        let mut roster = vec![("Alice".to_string(), false)];
        for i in 2..=n {
            roster.push((format!("AI_{}", i), true));
        }
        let configs = roster
            .into_iter()
            .enumerate()
            .map(|(i, (name, is_bot))| PlayerConfig {
                id: PlayerId(i),
                name,
                is_bot,
            })
            .collect();
        let mut game = Game::with_players(configs, TopicBook::builtin(), 3)
            .expect("test roster is valid");
        let mut predictor = InferencePredictor::default();
        let mut rng = StdRng::seed_from_u64(seed);
        game.start_game_with_rng(&mut rng, &mut predictor)
            .expect("fresh game starts");
        (game, predictor)
    }

    /// Overwrite the round's random draws with a known setup. The game stays
    /// in RoleReveal so tests can walk the normal transitions from there.
    pub(crate) fn rig_round(
        game: &mut Game,
        liar_idx: usize,
        topic: &str,
        secret_word: &str,
        turn_order: Vec<usize>,
    ) {
        for (i, p) in game.players.iter_mut().enumerate() {
            p.is_liar = i == liar_idx;
        }
        game.round_state = RoundState {
            topic: topic.to_string(),
            secret_word: secret_word.to_string(),
            liar_idx,
            turn_order,
            ..RoundState::default()
        };
        game.phase = Phase::RoleReveal;
    }

    /// Submit a plain description for every player, in turn order.
    pub(crate) fn drive_descriptions(game: &mut Game) {
        let mut i = 0;
        while game.phase == Phase::Explanation {
            let idx = game.round_state.turn_order[game.round_state.turn_cursor];
            let id = game.players[idx].id;
            game.submit_description(id, &format!("a perfectly ordinary remark {}", i))
                .expect("turn-order submission succeeds");
            i += 1;
        }
    }

    pub(crate) fn run_explanation(game: &mut Game) {
        game.proceed_to_explanation().expect("role reveal exits");
        drive_descriptions(game);
        assert_eq!(game.phase, Phase::Voting);
    }

    /// Play a full round in which the votes pile onto a non-liar, so the
    /// liar escapes and the round resolves without a guess step.
    pub(crate) fn resolve_round_with_liar_escape(game: &mut Game) {
        run_explanation(game);
        let liar = game.liar_id();
        let scapegoat = game
            .players
            .iter()
            .map(|p| p.id)
            .find(|id| *id != liar)
            .expect("at least one non-liar");
        // human first, then the rest, all onto the scapegoat
        let human = game.players[game.human_idx()].id;
        let mut order: Vec<PlayerId> = vec![human];
        order.extend(game.players.iter().map(|p| p.id).filter(|id| *id != human));
        for voter in order {
            let target = if voter == scapegoat { liar } else { scapegoat };
            game.submit_vote(voter, target).expect("vote applies");
        }
        assert_eq!(game.phase, Phase::Result);
        assert!(!game.round_state.liar_caught);
    }
}
