use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;

use application::ports::out_::RelayNotifier;
use domain::{ConnectionId, ServerMessage};

/// Records every delivery instead of writing to a socket.
pub struct InMemoryNotifier {
    delivered: RwLock<Vec<(ConnectionId, ServerMessage)>>,
    closed: RwLock<HashSet<ConnectionId>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self {
            delivered: RwLock::new(Vec::new()),
            closed: RwLock::new(HashSet::new()),
        }
    }

    /// Makes later deliveries to `connection_id` fail, as if its socket had gone away.
    pub fn close(
        &self,
        connection_id: ConnectionId,
    ) {
        self.closed.write().unwrap().insert(connection_id);
    }

    pub fn delivered(&self) -> Vec<(ConnectionId, ServerMessage)> {
        self.delivered.read().unwrap().clone()
    }

    pub fn delivered_to(
        &self,
        connection_id: ConnectionId,
    ) -> Vec<ServerMessage> {
        self.delivered
            .read()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == connection_id)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.delivered.write().unwrap().clear();
    }
}

impl Default for InMemoryNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RelayNotifier for InMemoryNotifier {
    async fn notify(
        &self,
        connection_id: ConnectionId,
        message: ServerMessage,
    ) -> bool {
        if self.closed.read().unwrap().contains(&connection_id) {
            return false;
        }
        self.delivered.write().unwrap().push((connection_id, message));
        true
    }
}
