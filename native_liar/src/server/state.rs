use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::RwLock;

use liar_shared::{PlayerId, ServerMsg};

use crate::bot::BotManager;
use crate::config::Config;
use crate::game::Game;
use crate::inference::InferencePredictor;

pub const CHANNEL_BUFFER_SIZE: usize = 256;

/// Shared application state exposed to handlers.
///
/// One session per server process; everything that mutates the session goes
/// through the lobby's write lock, which serializes phase transitions.
#[derive(Clone)]
pub struct AppState {
    pub(crate) lobby: Arc<RwLock<Lobby>>,
    pub broadcaster: broadcast::Sender<ServerMsg>,
    pub config: Arc<RwLock<Config>>,
    pub config_path: Option<PathBuf>,
}

impl AppState {
    /// Create a new AppState with the given config and optional config path.
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_BUFFER_SIZE);
        let predictor = config.build_predictor();
        Self {
            lobby: Arc::new(RwLock::new(Lobby::with_predictor(predictor))),
            broadcaster: tx,
            config: Arc::new(RwLock::new(config)),
            config_path,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default(), None)
    }
}

/// The hosted session plus the backend-only bookkeeping around it. The
/// engine stays unaware of which players are bots; the lobby tracks their
/// ids and owns the bot brain and the predictor.
pub struct Lobby {
    pub(crate) game: Option<Game>,
    /// Player ids driven by bot mechanisms.
    pub(crate) bots: Vec<PlayerId>,
    /// Prevents concurrent drive loops from multiple transports.
    pub(crate) driving: bool,
    pub(crate) bot_manager: BotManager,
    pub(crate) predictor: InferencePredictor,
    pub(crate) last_printed_log_len: usize,
    /// Bumped on every successful mutation; a turn timer armed under an
    /// older epoch must not fire.
    pub(crate) turn_epoch: u64,
}

impl Lobby {
    pub(crate) fn with_predictor(predictor: InferencePredictor) -> Self {
        Self {
            game: None,
            bots: Vec::new(),
            driving: false,
            bot_manager: BotManager::new(),
            predictor,
            last_printed_log_len: 0,
            turn_epoch: 0,
        }
    }

    /// The single human player's id, once a game exists.
    pub(crate) fn human_id(&self) -> Option<PlayerId> {
        self.game
            .as_ref()
            .map(|g| g.players[g.human_idx()].id)
    }

    pub(crate) fn is_bot(&self, id: PlayerId) -> bool {
        self.bots.contains(&id)
    }
}

impl Default for Lobby {
    fn default() -> Self {
        Self::with_predictor(InferencePredictor::default())
    }
}
