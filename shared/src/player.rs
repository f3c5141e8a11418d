//! Player-related types and identifiers for the Liar Game.

use serde::{Deserialize, Serialize};

/// Unique identifier for a player in a session.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PlayerId(pub usize);

impl From<usize> for PlayerId {
    fn from(v: usize) -> Self {
        PlayerId(v)
    }
}

impl From<PlayerId> for usize {
    fn from(player_id: PlayerId) -> Self {
        player_id.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public view of a player's state (what every player can see).
///
/// Role flags are deliberately absent: whether a player is the liar is only
/// revealed through the event log once a round resolves.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerPublic {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
    pub is_human: bool,
    pub has_described: bool,
    pub has_voted: bool,
}

/// Configuration for setting up a player in a new session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub id: PlayerId,
    pub name: String,
    pub is_bot: bool, // true if driven by bot mechanisms, false if waits for messages
}
