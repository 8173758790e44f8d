use std::collections::HashMap;

use crate::{AccountId, ConnectionId, Player, PlayerId, RelayError};

/// Live connections and the player identity bound to each of them.
///
/// Both directions are indexed, so resolving a connection to its player and a
/// player to its connection are single map lookups.
#[derive(Default, Debug)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, Option<PlayerId>>,
    players: HashMap<PlayerId, Player>,
}

impl ConnectionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self) -> ConnectionId {
        let connection_id = ConnectionId::new();
        self.connections.insert(connection_id, None);
        connection_id
    }

    pub fn bind(
        &mut self,
        connection_id: ConnectionId,
        player_id: PlayerId,
        display_name: String,
        account_id: Option<AccountId>,
    ) -> Result<&Player, RelayError> {
        let slot = self
            .connections
            .get_mut(&connection_id)
            .ok_or(RelayError::UnknownConnection(connection_id))?;
        if let Some(bound) = slot {
            return Err(RelayError::AlreadyJoined {
                connection_id,
                player_id: bound.clone(),
            });
        }
        if self.players.contains_key(&player_id) {
            return Err(RelayError::DuplicatePlayerId(player_id));
        }

        *slot = Some(player_id.clone());
        let player = Player::new(player_id.clone(), display_name, account_id, connection_id);
        Ok(self.players.entry(player_id).or_insert(player))
    }

    /// Forgets the player bound to `connection_id` while keeping the connection registered.
    pub fn unbind(
        &mut self,
        connection_id: ConnectionId,
    ) -> Option<Player> {
        let player_id = self.connections.get_mut(&connection_id)?.take()?;
        self.players.remove(&player_id)
    }

    /// Drops the connection entirely, returning whichever player was bound to it.
    pub fn deregister(
        &mut self,
        connection_id: ConnectionId,
    ) -> Option<Player> {
        let player_id = self.connections.remove(&connection_id)??;
        self.players.remove(&player_id)
    }

    pub fn is_registered(
        &self,
        connection_id: ConnectionId,
    ) -> bool {
        self.connections.contains_key(&connection_id)
    }

    pub fn player_id_of(
        &self,
        connection_id: ConnectionId,
    ) -> Option<&PlayerId> {
        self.connections.get(&connection_id)?.as_ref()
    }

    pub fn player_of(
        &self,
        connection_id: ConnectionId,
    ) -> Option<&Player> {
        self.player_id_of(connection_id).and_then(|pid| self.players.get(pid))
    }

    pub fn player(
        &self,
        player_id: &PlayerId,
    ) -> Option<&Player> {
        self.players.get(player_id)
    }

    pub fn player_mut(
        &mut self,
        player_id: &PlayerId,
    ) -> Option<&mut Player> {
        self.players.get_mut(player_id)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}
