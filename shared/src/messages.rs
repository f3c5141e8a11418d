//! Client-server messaging protocol for the Liar Game.

use serde::{Deserialize, Serialize};

use crate::game::{ActionEvent, Phase, PlayerAction};
use crate::hint::HintEntry;
use crate::player::{PlayerConfig, PlayerId, PlayerPublic};

/// One submitted description, in speaking order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DescriptionPublic {
    pub player_id: PlayerId,
    pub text: String,
}

/// Complete public view of the game state, personalized per viewer.
///
/// `secret_word` is `None` when the viewer is the liar of the current round
/// and the round has not resolved yet; `hint` is only populated for a human
/// liar viewer once the predictor has run for the round.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameStatePublic {
    pub players: Vec<PlayerPublic>,
    pub phase: Phase,
    pub round: u32,
    pub total_rounds: u32,
    pub topic: Option<String>,
    pub secret_word: Option<String>,
    pub you: PlayerId,
    #[serde(default)]
    pub you_are_liar: bool,
    pub to_act: Option<PlayerId>,
    pub descriptions: Vec<DescriptionPublic>,
    #[serde(default)]
    pub hint: Option<Vec<HintEntry>>,
    /// Set while the caught liar still has their guess attempt open.
    #[serde(default)]
    pub awaiting_guess: Option<PlayerId>,
    #[serde(default)]
    pub winner_ids: Vec<PlayerId>,
    #[serde(default)]
    pub action_log: Vec<ActionEvent>,
}

/// Messages that clients can send to the server.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMsg {
    /// Create a fresh session with the given roster and start round 1.
    NewGame { players: Vec<PlayerConfig> },
    /// Player-initiated action: must specify which player is acting.
    Action {
        player_id: PlayerId,
        action: PlayerAction,
    },
    /// Leave role reveal and begin the explanation turns.
    Proceed,
    /// Drive exactly one pending AI description turn.
    NextAiTurn,
    /// Advance from the round result to the next round (or game over).
    NextRound,
    RequestState,
    Ping,
}

/// Messages that the server can send to clients.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMsg {
    Welcome { you: PlayerId },
    State(GameStatePublic),
    Error(String),
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_msg_round_trips_through_json() {
        let msg = ClientMsg::Action {
            player_id: PlayerId(1),
            action: PlayerAction::Describe("it barks".into()),
        };
        let txt = serde_json::to_string(&msg).unwrap();
        let back: ClientMsg = serde_json::from_str(&txt).unwrap();
        match back {
            ClientMsg::Action { player_id, action } => {
                assert_eq!(player_id, PlayerId(1));
                assert!(matches!(action, PlayerAction::Describe(t) if t == "it barks"));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn tagged_representation_is_stable() {
        let txt = serde_json::to_string(&ClientMsg::RequestState).unwrap();
        assert_eq!(txt, r#"{"type":"RequestState"}"#);
    }
}
