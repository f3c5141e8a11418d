//! Core Game, Player and RoundState definitions + constructors and small
//! helpers.

use liar_shared::{
    ActionEvent, DescriptionPublic, GameStatePublic, HintEntry, Phase, PlayerConfig, PlayerId,
    PlayerPublic,
};

use crate::error::GameError;
use crate::inference::InferencePredictor;
use crate::topics::TopicBook;

pub(crate) const MAX_RECENT_ACTIONS: usize = 200;

/// Default number of rounds per session.
pub const DEFAULT_TOTAL_ROUNDS: u32 = 3;

#[derive(Clone, Debug)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_human: bool,
    pub is_liar: bool,
    pub score: u32,
}

#[derive(Clone, Debug)]
pub struct Description {
    pub player: PlayerId,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct Vote {
    pub voter: PlayerId,
    pub target: PlayerId,
}

/// Round-scoped state. Replaced wholesale at every round transition so no
/// stale value can leak between rounds.
#[derive(Clone, Debug, Default)]
pub struct RoundState {
    pub topic: String,
    pub secret_word: String,
    pub liar_idx: usize,
    /// Permutation of player indices; the liar never sits at position 0.
    pub turn_order: Vec<usize>,
    pub turn_cursor: usize,
    /// Insertion order is the speaking order.
    pub descriptions: Vec<Description>,
    pub votes: Vec<Vote>,
    /// Predictor hint for a human liar, computed at most once per round.
    pub hint: Option<Vec<HintEntry>>,
    /// Guard: the Result-phase scoring logic runs exactly once.
    pub scored: bool,
    /// Guard: the liar's guess attempt resolves exactly once.
    pub guess_resolved: bool,
    pub liar_caught: bool,
    pub most_accused: Vec<usize>,
}

#[derive(Clone, Debug)]
pub struct Game {
    pub players: Vec<Player>,
    pub phase: Phase,
    /// 1-indexed; 0 until the game starts.
    pub round: u32,
    pub total_rounds: u32,
    pub round_state: RoundState,
    pub winner_ids: Vec<PlayerId>,
    // canonical in-memory store of typed events
    pub recent_actions: Vec<ActionEvent>,
    pub topics: TopicBook,
}

impl Game {
    /// Create a session in the Setup phase. Rejects rosters that cannot make
    /// a valid game: fewer than 3 players, not exactly one human, duplicate
    /// or empty names, duplicate ids.
    pub fn with_players(
        configs: Vec<PlayerConfig>,
        topics: TopicBook,
        total_rounds: u32,
    ) -> Result<Self, GameError> {
        if configs.len() < 3 {
            return Err(GameError::InvalidSetup(format!(
                "need at least 3 players, got {}",
                configs.len()
            )));
        }
        let humans = configs.iter().filter(|c| !c.is_bot).count();
        if humans != 1 {
            return Err(GameError::InvalidSetup(format!(
                "exactly one human player required, got {}",
                humans
            )));
        }
        if total_rounds == 0 {
            return Err(GameError::InvalidSetup("total rounds must be >= 1".into()));
        }
        for (i, c) in configs.iter().enumerate() {
            if c.name.trim().is_empty() {
                return Err(GameError::InvalidSetup(format!(
                    "player {} has an empty name",
                    c.id
                )));
            }
            for other in &configs[..i] {
                if other.name == c.name {
                    return Err(GameError::InvalidSetup(format!(
                        "duplicate player name '{}'",
                        c.name
                    )));
                }
                if other.id == c.id {
                    return Err(GameError::InvalidSetup(format!(
                        "duplicate player id {}",
                        c.id
                    )));
                }
            }
        }

        let players = configs
            .into_iter()
            .map(|c| Player {
                id: c.id,
                name: c.name,
                is_human: !c.is_bot,
                is_liar: false,
                score: 0,
            })
            .collect();

        Ok(Self {
            players,
            phase: Phase::Setup,
            round: 0,
            total_rounds,
            round_state: RoundState::default(),
            winner_ids: Vec::new(),
            recent_actions: Vec::new(),
            topics,
        })
    }

    /// Finalize the roster and start round 1.
    pub fn start_game(&mut self, predictor: &mut InferencePredictor) -> Result<(), GameError> {
        self.start_game_with_rng(&mut rand::rng(), predictor)
    }

    /// Deterministic variant for tests and tools.
    pub fn start_game_with_rng<R: rand::Rng>(
        &mut self,
        rng: &mut R,
        predictor: &mut InferencePredictor,
    ) -> Result<(), GameError> {
        if self.phase != Phase::Setup {
            return Err(GameError::OutOfTurn {
                action: "startGame",
                phase: self.phase,
            });
        }
        self.round = 1;
        self.start_round_with_rng(rng, predictor);
        Ok(())
    }

    pub(crate) fn index_of(&self, id: PlayerId) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or(GameError::UnknownPlayer(id))
    }

    pub fn liar_id(&self) -> PlayerId {
        self.players[self.round_state.liar_idx].id
    }

    /// The single human player's index (guaranteed by setup validation).
    pub fn human_idx(&self) -> usize {
        self.players
            .iter()
            .position(|p| p.is_human)
            .expect("setup validation guarantees one human")
    }

    /// Whose discrete action the session is waiting for, if anyone's.
    pub fn to_act(&self) -> Option<PlayerId> {
        let rs = &self.round_state;
        match self.phase {
            Phase::Explanation => rs
                .turn_order
                .get(rs.turn_cursor)
                .map(|&idx| self.players[idx].id),
            Phase::Voting => {
                let human = &self.players[self.human_idx()];
                (!self.has_voted(human.id)).then_some(human.id)
            }
            Phase::Result => {
                (rs.liar_caught && !rs.guess_resolved).then(|| self.liar_id())
            }
            _ => None,
        }
    }

    /// Token identifying the current explanation turn; a timer armed for one
    /// turn must not fire on a later one.
    pub fn turn_token(&self) -> (u32, usize) {
        (self.round, self.round_state.turn_cursor)
    }

    /// All descriptions so far, concatenated in speaking order. This is the
    /// predictor/bot query text.
    pub fn aggregated_descriptions(&self) -> String {
        super::utils::aggregate_descriptions(self)
    }

    /// Viewer-personalized projection. The secret word is withheld from the
    /// liar's own view until the round resolves; the predictor hint is only
    /// shown to a human liar.
    pub fn public_for(&self, viewer: PlayerId) -> GameStatePublic {
        let rs = &self.round_state;
        let in_round = !matches!(self.phase, Phase::Setup | Phase::GameOver);
        let viewer_idx = self.players.iter().position(|p| p.id == viewer);
        let viewer_is_liar = in_round && viewer_idx == Some(rs.liar_idx);

        let players = self
            .players
            .iter()
            .map(|p| PlayerPublic {
                id: p.id,
                name: p.name.clone(),
                score: p.score,
                is_human: p.is_human,
                has_described: rs.descriptions.iter().any(|d| d.player == p.id),
                has_voted: rs.votes.iter().any(|v| v.voter == p.id),
            })
            .collect();

        let secret_word = if !in_round {
            None
        } else if viewer_is_liar && !rs.scored {
            None
        } else {
            Some(rs.secret_word.clone())
        };

        let hint = if viewer_is_liar && self.players[rs.liar_idx].is_human {
            rs.hint.clone()
        } else {
            None
        };

        GameStatePublic {
            players,
            phase: self.phase,
            round: self.round,
            total_rounds: self.total_rounds,
            topic: in_round.then(|| rs.topic.clone()),
            secret_word,
            you: viewer,
            you_are_liar: viewer_is_liar,
            to_act: self.to_act(),
            descriptions: rs
                .descriptions
                .iter()
                .map(|d| DescriptionPublic {
                    player_id: d.player,
                    text: d.text.clone(),
                })
                .collect(),
            hint,
            awaiting_guess: (self.phase == Phase::Result
                && rs.liar_caught
                && !rs.guess_resolved)
                .then(|| self.liar_id()),
            winner_ids: self.winner_ids.clone(),
            action_log: self.recent_actions.clone(),
        }
    }

    pub(crate) fn log(&mut self, ev: ActionEvent) {
        // canonical store is recent_actions (typed ActionEvent).
        self.recent_actions.push(ev);
        super::utils::cap_logs(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::utils::test_support::{configs, fresh_game};

    #[test]
    fn rejects_fewer_than_three_players() {
        let err = Game::with_players(
            configs(&[("Alice", false), ("AI_2", true)]),
            TopicBook::builtin(),
            3,
        )
        .unwrap_err();
        assert!(matches!(err, GameError::InvalidSetup(_)));
    }

    #[test]
    fn rejects_zero_or_two_humans() {
        let err = Game::with_players(
            configs(&[("AI_1", true), ("AI_2", true), ("AI_3", true)]),
            TopicBook::builtin(),
            3,
        )
        .unwrap_err();
        assert!(matches!(err, GameError::InvalidSetup(_)));

        let err = Game::with_players(
            configs(&[("Alice", false), ("Bob", false), ("AI_3", true)]),
            TopicBook::builtin(),
            3,
        )
        .unwrap_err();
        assert!(matches!(err, GameError::InvalidSetup(_)));
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = Game::with_players(
            configs(&[("Alice", false), ("AI_2", true), ("AI_2", true)]),
            TopicBook::builtin(),
            3,
        )
        .unwrap_err();
        assert!(matches!(err, GameError::InvalidSetup(_)));
    }

    #[test]
    fn started_game_exposes_topic_to_every_viewer() {
        let (game, _) = fresh_game(3, 42);
        for p in &game.players {
            let view = game.public_for(p.id);
            assert_eq!(view.round, 1);
            assert!(view.topic.is_some(), "topic is shown to all, liar included");
        }
    }

    #[test]
    fn secret_word_withheld_from_liar_view_only() {
        let (game, _) = fresh_game(4, 7);
        let liar = game.liar_id();
        for p in &game.players {
            let view = game.public_for(p.id);
            if p.id == liar {
                assert!(view.secret_word.is_none(), "liar must not see the word");
                assert!(view.you_are_liar);
            } else {
                assert_eq!(view.secret_word.as_deref(), Some(game.round_state.secret_word.as_str()));
                assert!(!view.you_are_liar);
            }
        }
    }
}
