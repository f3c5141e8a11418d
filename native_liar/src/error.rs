//! Engine error taxonomy.
//!
//! Everything except `InvalidSetup` is locally recoverable: the action is
//! rejected, the session state is unchanged, and the message is surfaced to
//! the caller.

use liar_shared::{Phase, PlayerId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GameError {
    /// Roster rejected at session creation; the game does not start.
    #[error("invalid setup: {0}")]
    InvalidSetup(String),

    /// An action arrived in a phase that does not expect it.
    #[error("'{action}' is not allowed during the {phase:?} phase")]
    OutOfTurn {
        action: &'static str,
        phase: Phase,
    },

    #[error("it is not player {0}'s turn")]
    NotYourTurn(PlayerId),

    #[error("unknown player id {0}")]
    UnknownPlayer(PlayerId),

    /// Empty/whitespace-only description: re-prompt, turn does not advance.
    #[error("a description must not be empty")]
    EmptyDescription,

    #[error("players cannot vote for themselves")]
    SelfVote,

    #[error("player {0} has already voted this round")]
    DuplicateVote(PlayerId),

    /// Guard against the Result-phase scoring/guess logic running twice.
    #[error("round scoring has already been applied")]
    DuplicateScoring,
}
