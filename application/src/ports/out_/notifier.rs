use async_trait::async_trait;

use domain::{ConnectionId, ServerMessage};

/// Delivers server frames to a live connection.
///
/// Delivery is fire-and-forget: implementations must not wait for the peer,
/// and report `false` when the connection is gone or cannot take the frame.
#[async_trait]
pub trait RelayNotifier: Send + Sync {
    async fn notify(
        &self,
        connection_id: ConnectionId,
        message: ServerMessage,
    ) -> bool;
}
