//! Types shared between the Liar Game engine/server and its clients.

pub mod game;
pub mod hint;
pub mod messages;
pub mod player;

pub use game::{ActionEvent, ActionKind, GameAction, Phase, PlayerAction};
pub use hint::HintEntry;
pub use messages::{ClientMsg, DescriptionPublic, GameStatePublic, ServerMsg};
pub use player::{PlayerConfig, PlayerId, PlayerPublic};
