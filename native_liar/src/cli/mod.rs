use clap::Parser;
use std::path::PathBuf;

/// Server CLI for liar-server
#[derive(Parser, Debug, Clone)]
#[command(name = "liar-server", version, about = "Liar Game server")]
pub struct ServerCli {
    /// Path to config file
    #[arg(long, default_value = "liar-server.toml")]
    pub config: PathBuf,

    /// Number of AI players to seat (overrides config)
    #[arg(long)]
    pub bots: Option<usize>,

    /// Rounds per session (overrides config)
    #[arg(long)]
    pub rounds: Option<u32>,

    /// Verbose logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}
