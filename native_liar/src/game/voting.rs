//! Voting phase: one accusation per player, no self-votes, applied as one
//! logical batch (the server casts the human vote first, then every AI vote
//! against the same description set, under a single lock).

use liar_shared::{ActionEvent, ActionKind, Phase, PlayerId};

use super::{Game, Vote};
use crate::error::GameError;

impl Game {
    pub fn has_voted(&self, voter: PlayerId) -> bool {
        self.round_state.votes.iter().any(|v| v.voter == voter)
    }

    pub fn votes_complete(&self) -> bool {
        self.round_state.votes.len() >= self.players.len()
    }

    /// Record one accusation. Once every player has voted the round resolves
    /// immediately (tally, scoring, Result phase).
    pub fn submit_vote(&mut self, voter: PlayerId, target: PlayerId) -> Result<(), GameError> {
        if self.phase != Phase::Voting {
            return Err(GameError::OutOfTurn {
                action: "submitVote",
                phase: self.phase,
            });
        }
        self.index_of(voter)?;
        self.index_of(target)?;
        if voter == target {
            return Err(GameError::SelfVote);
        }
        if self.has_voted(voter) {
            return Err(GameError::DuplicateVote(voter));
        }

        self.round_state.votes.push(Vote { voter, target });
        self.log(ActionEvent::player(voter, ActionKind::Voted(target)));

        if self.votes_complete() {
            self.resolve_votes();
        }
        Ok(())
    }
}
