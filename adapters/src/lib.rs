mod in_memory;
pub mod web;

#[cfg(test)]
mod tests;

pub use in_memory::InMemoryNotifier;
pub use web::{AppState, WebSocketNotifier, create_app_state, get_stats, handle_connection};
