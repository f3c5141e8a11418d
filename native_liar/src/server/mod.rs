pub mod bot_driver;
pub mod game_ops;
pub mod http;
pub mod run;
pub mod state;
pub mod turn_timer;
pub mod ws;

// Export commonly used types and functions
pub use game_ops::{broadcast_state, current_state_public, handle_client_msg};
pub use run::{build_router, run_server};
pub use state::AppState;
