mod handler;
mod notifier;

pub use handler::handle_connection;
pub use notifier::WebSocketNotifier;
