use thiserror::Error;

use crate::{ConnectionId, PlayerId};

/// Protocol-order violations and lookups that miss.
///
/// None of these are fatal; the dispatcher logs them and carries on without replying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),

    #[error("connection {connection_id} already joined as {player_id}")]
    AlreadyJoined {
        connection_id: ConnectionId,
        player_id: PlayerId,
    },

    #[error("player id {0} is bound to another live connection")]
    DuplicatePlayerId(PlayerId),

    #[error("connection {0} has not joined matchmaking")]
    NotJoined(ConnectionId),

    #[error("player {0} is not in a match")]
    NotInMatch(PlayerId),
}
