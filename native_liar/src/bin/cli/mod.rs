mod args;
mod transport;
mod utils;
mod watch;

pub use args::{Cli, Commands, TransportKind};
pub use transport::{run_once_http, run_once_ws};
pub use utils::{generate_demo_players, DisplayMode, MessagePrinter};
pub use watch::watch_ws;
