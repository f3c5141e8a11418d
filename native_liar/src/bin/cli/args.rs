use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "liar-cli", version, about = "Headless CLI for the Liar Game server", long_about = None)]
pub struct Cli {
    /// Join name to use for the single human player
    #[arg(short, long, default_value = "CLI")]
    pub name: String,

    /// Number of AI opponents when starting a new game
    #[arg(long, default_value_t = 2)]
    pub bots: usize,

    /// Transport to use and its address. Accepted forms:
    /// - Full URL starting with http:// or https:// (treated as HTTP)
    ///   (e.g. --transport 'http://localhost:3000')
    /// - Full URL starting with ws:// or wss:// (treated as WebSocket)
    ///   (e.g. --transport 'ws://localhost:3000/ws')
    ///
    /// Default: http://localhost:3000
    #[arg(long, default_value = "http://localhost:3000")]
    pub transport: TransportKind,

    /// How long to wait for server state updates after sending a command (ms)
    #[arg(long, default_value_t = 1200)]
    pub wait_ms: u64,

    /// Output JSON instead of human-readable text
    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Request the latest State and print it
    State,
    /// Start a new game (you + --bots AI players)
    NewGame,
    /// Leave role reveal and begin the description turns
    Proceed,
    /// Submit your description for this turn
    Describe {
        /// The description text
        text: String,
    },
    /// Accuse a player of being the liar (player id as shown in State)
    Vote {
        /// Accused player's id
        target: usize,
    },
    /// As the caught liar, guess the secret word
    Guess {
        /// The guessed word
        word: String,
    },
    /// Advance to the next round after a result
    NextRound,
    /// Drive one pending AI description turn
    NextAiTurn,
    /// Watch game events continuously and print them as they happen
    Watch,
}

/// Transport kind for the CLI. Each variant carries an address string:
/// - Http(address)      : HTTP server base URL (e.g. http://host:port)
/// - WebSocket(address) : WebSocket URL (e.g. ws://host:port/ws)
#[derive(Debug, Clone)]
pub enum TransportKind {
    WebSocket(String),
    Http(String),
}

impl std::str::FromStr for TransportKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("transport cannot be empty".into());
        }
        let lower = s.to_ascii_lowercase();

        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(TransportKind::Http(s.to_string()));
        }
        if lower.starts_with("ws://") || lower.starts_with("wss://") {
            return Ok(TransportKind::WebSocket(s.to_string()));
        }

        Err(format!(
            "unknown transport '{}', expected forms: http(s)://URL or ws(s)://URL",
            s
        ))
    }
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportKind::WebSocket(addr) => write!(f, "{}", addr),
            TransportKind::Http(addr) => write!(f, "{}", addr),
        }
    }
}
