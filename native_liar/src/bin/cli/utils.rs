use std::io::IsTerminal;

use liar_shared::{GameStatePublic, PlayerConfig, PlayerId, ServerMsg};

use native_liar::pretty::{format_event_human, format_round_header, format_state_human};

#[derive(Clone, Copy)]
pub enum DisplayMode {
    FullState,
    Incremental,
}

pub struct MessagePrinter {
    json: bool,
    mode: DisplayMode,
    last_printed: usize,
    latest_state: Option<GameStatePublic>,
}

impl MessagePrinter {
    pub fn new(json: bool, mode: DisplayMode) -> Self {
        Self {
            json,
            mode,
            last_printed: 0,
            latest_state: None,
        }
    }

    pub fn handle(&mut self, msg: &ServerMsg) {
        match msg {
            ServerMsg::State(gs) => {
                self.latest_state = Some(gs.clone());
                match self.mode {
                    DisplayMode::FullState => self.print_full_state(gs),
                    DisplayMode::Incremental => self.print_incremental(gs),
                }
            }
            ServerMsg::Welcome { you } => {
                if !self.json {
                    println!("Joined as player {}", you);
                }
            }
            ServerMsg::Error(e) => eprintln!("Server error: {}", e),
            ServerMsg::Pong => println!("Received pong"),
        }
    }

    fn print_full_state(&self, gs: &GameStatePublic) {
        if self.json {
            match serde_json::to_string_pretty(gs) {
                Ok(json_str) => println!("{}", json_str),
                Err(e) => eprintln!("Failed to serialize state to JSON: {}", e),
            }
        } else {
            let use_color = std::io::stdout().is_terminal();
            println!("{}", format_state_human(gs, use_color));
        }
    }

    fn print_incremental(&mut self, gs: &GameStatePublic) {
        if self.json {
            match serde_json::to_string_pretty(gs) {
                Ok(json_str) => println!("{}", json_str),
                Err(e) => eprintln!("Failed to serialize state to JSON: {}", e),
            }
            return;
        }

        let use_color = std::io::stdout().is_terminal();
        let already = self.last_printed;
        let total = gs.action_log.len();
        if total < already {
            // a new game truncated the log; print a fresh header
            println!("{}", format_round_header(gs, use_color));
            self.last_printed = total;
        } else if total > already {
            for e in gs.action_log.iter().skip(already) {
                println!("{}", format_event_human(e, &gs.players, use_color));
            }
            self.last_printed = total;
        }
    }
}

pub fn generate_demo_players(human_name: &str, bots: usize) -> Vec<PlayerConfig> {
    let mut players = Vec::with_capacity(1 + bots);
    players.push(PlayerConfig {
        id: PlayerId(0),
        name: human_name.to_string(),
        is_bot: false,
    });
    for i in 1..=bots {
        players.push(PlayerConfig {
            id: PlayerId(i),
            name: format!("AI_{}", i + 1),
            is_bot: true,
        });
    }
    players
}
