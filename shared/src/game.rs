//! Phases, actions and event types for the Liar Game.

use serde::{Deserialize, Serialize};

use crate::player::PlayerId;

/// The current phase of a game session.
///
/// A round moves strictly `RoleReveal -> Explanation -> Voting -> Result`;
/// from `Result` it either loops back to `RoleReveal` for the next round or
/// terminates in `GameOver`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    Setup,
    RoleReveal,
    Explanation,
    Voting,
    Result,
    GameOver,
}

/// Player-initiated action types.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Submit a one-sentence description of the secret word.
    Describe(String),
    /// Accuse a player of being the liar.
    Vote(PlayerId),
    /// The caught liar's single attempt at guessing the secret word.
    Guess(String),
}

/// Player-side action kinds used in logs/history (keeps richer semantics
/// than the inbound [`PlayerAction`]).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ActionKind {
    Described(String),
    Voted(PlayerId),
    Guessed { word: String, correct: bool },
    TimedOut,
}

/// Game-level events emitted by the state machine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum GameAction {
    RoundStarted { round: u32, topic: String },
    PhaseChanged(Phase),
    VotesRevealed { votes: Vec<(PlayerId, PlayerId)> },
    LiarRevealed { liar: PlayerId, secret_word: String },
    PointsAwarded { players: Vec<PlayerId>, points: u32 },
    GameOver { winners: Vec<PlayerId> },
}

/// A single recorded action/event in the game. This is the canonical, typed
/// source-of-truth for both UI and logs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ActionEvent {
    PlayerAction {
        player_id: PlayerId,
        action: ActionKind,
    },
    GameAction(GameAction),
}

impl ActionEvent {
    /// Helper to create a PlayerAction event from a player id + ActionKind
    pub fn player(player_id: PlayerId, action: ActionKind) -> Self {
        ActionEvent::PlayerAction { player_id, action }
    }

    /// Helper to create a GameAction event
    pub fn game(action: GameAction) -> Self {
        ActionEvent::GameAction(action)
    }
}
