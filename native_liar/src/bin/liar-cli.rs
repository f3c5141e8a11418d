mod cli;

use clap::Parser;
use cli::{generate_demo_players, Cli, Commands, DisplayMode, MessagePrinter, TransportKind};
use liar_shared::{ClientMsg, PlayerAction, PlayerId};

/// The CLI always seats the human at id 0 (see `generate_demo_players`).
const YOU: PlayerId = PlayerId(0);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let transport = cli.transport.clone();

    if let Commands::Watch = cli.command {
        return match &transport {
            TransportKind::WebSocket(addr) | TransportKind::Http(addr) => {
                cli::watch_ws(addr, cli.json).await
            }
        };
    }

    let msg = match &cli.command {
        Commands::State => ClientMsg::RequestState,
        Commands::NewGame => ClientMsg::NewGame {
            players: generate_demo_players(&cli.name, cli.bots),
        },
        Commands::Proceed => ClientMsg::Proceed,
        Commands::Describe { text } => ClientMsg::Action {
            player_id: YOU,
            action: PlayerAction::Describe(text.clone()),
        },
        Commands::Vote { target } => ClientMsg::Action {
            player_id: YOU,
            action: PlayerAction::Vote(PlayerId(*target)),
        },
        Commands::Guess { word } => ClientMsg::Action {
            player_id: YOU,
            action: PlayerAction::Guess(word.clone()),
        },
        Commands::NextRound => ClientMsg::NextRound,
        Commands::NextAiTurn => ClientMsg::NextAiTurn,
        Commands::Watch => unreachable!("handled above"),
    };

    let mode = match cli.command {
        Commands::State => DisplayMode::FullState,
        _ => DisplayMode::Incremental,
    };
    let mut printer = MessagePrinter::new(cli.json, mode);

    match &transport {
        TransportKind::Http(addr) => {
            cli::run_once_http(addr, msg, cli.wait_ms, &mut printer).await?
        }
        TransportKind::WebSocket(addr) => {
            cli::run_once_ws(addr, msg, cli.wait_ms, &mut printer).await?
        }
    }

    Ok(())
}
