mod http;
mod state;
mod websocket;

pub use http::get_stats;
pub use state::{AppState, create_app_state};
pub use websocket::{WebSocketNotifier, handle_connection};
