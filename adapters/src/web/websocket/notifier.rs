use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, warn};

use application::ports::out_::RelayNotifier;
use domain::{ConnectionId, ServerMessage};

/// Frames a slow client may have pending before further frames are dropped.
const SEND_QUEUE_CAPACITY: usize = 64;

/// Outbound side of every live socket, keyed by connection id.
///
/// Each socket has a writer task draining its own queue, so notifying never
/// waits on a peer.
pub struct WebSocketNotifier {
    connections: RwLock<HashMap<ConnectionId, mpsc::Sender<String>>>,
}

impl WebSocketNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Opens the send queue for a connection. The writer task owns the receiver.
    pub async fn register(
        &self,
        connection_id: ConnectionId,
    ) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(SEND_QUEUE_CAPACITY);
        self.connections.write().await.insert(connection_id, tx);
        rx
    }

    /// Closes the send queue; the writer task ends once it has flushed what is left.
    pub async fn unregister(
        &self,
        connection_id: ConnectionId,
    ) {
        self.connections.write().await.remove(&connection_id);
    }

    pub async fn is_registered(
        &self,
        connection_id: ConnectionId,
    ) -> bool {
        self.connections.read().await.contains_key(&connection_id)
    }

    async fn send_to_connection(
        &self,
        connection_id: ConnectionId,
        message: String,
    ) -> bool {
        debug!(connection_id = %connection_id, message = %message, "-> Sending");
        let connections = self.connections.read().await;
        let Some(sender) = connections.get(&connection_id) else {
            debug!(connection_id = %connection_id, "No socket for connection");
            return false;
        };
        match sender.try_send(message) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(connection_id = %connection_id, "Send queue full, frame dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!(connection_id = %connection_id, "Send queue closed");
                false
            }
        }
    }
}

impl Default for WebSocketNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RelayNotifier for WebSocketNotifier {
    async fn notify(
        &self,
        connection_id: ConnectionId,
        message: ServerMessage,
    ) -> bool {
        match message.encode() {
            Ok(text) => self.send_to_connection(connection_id, text).await,
            Err(e) => {
                warn!(connection_id = %connection_id, error = %e, "Failed to encode message");
                false
            }
        }
    }
}
