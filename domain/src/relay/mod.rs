use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    ConnectionId, ConnectionRegistry, JoinRequest, MatchId, MatchStatus, MatchTable, Notice, OpponentInfo, PlayerId,
    PlayerStatus, RelayError, Role, ServerMessage, Signal, WaitingQueue,
};


/// Outbound traffic produced by one state transition, delivered by the caller
/// after the transition has been fully applied.
#[derive(Clone, Debug, PartialEq)]
pub enum RelayEffect {
    Notify {
        connection_id: ConnectionId,
        notice: Notice,
    },
    Forward {
        connection_id: ConnectionId,
        frame: Map<String, Value>,
    },
}

impl RelayEffect {
    pub fn connection_id(&self) -> ConnectionId {
        match self {
            RelayEffect::Notify { connection_id, .. } | RelayEffect::Forward { connection_id, .. } => *connection_id,
        }
    }

    pub fn into_message(self) -> (ConnectionId, ServerMessage) {
        match self {
            RelayEffect::Notify { connection_id, notice } => (connection_id, ServerMessage::Notice(notice)),
            RelayEffect::Forward { connection_id, frame } => (connection_id, ServerMessage::Signal(frame)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RelayStats {
    pub connections: usize,
    pub players: usize,
    pub waiting: usize,
    pub matches: usize,
}

/// Registry, waiting queue and match table under a single owner.
///
/// Every method applies its whole transition before returning, so the
/// waiting/in-match exclusivity holds between any two calls. Callers that
/// share this across tasks must guard it with one lock.
#[derive(Default, Debug)]
pub struct RelayState {
    registry: ConnectionRegistry,
    queue: WaitingQueue,
    matches: MatchTable,
}

impl RelayState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self) -> ConnectionId {
        self.registry.register()
    }

    /// Binds the joining identity, then pairs it with the longest-waiting
    /// player or parks it in the queue.
    pub fn join(
        &mut self,
        connection_id: ConnectionId,
        request: JoinRequest,
    ) -> Result<Vec<RelayEffect>, RelayError> {
        let guest = self
            .registry
            .bind(connection_id, request.player_id, request.username, request.user_id)?
            .clone();

        let Some(host_id) = self.next_waiting_host() else {
            self.queue.enqueue(guest.player_id);
            return Ok(vec![RelayEffect::Notify {
                connection_id,
                notice: Notice::waiting_opponent(),
            }]);
        };

        let match_id = self.matches.create(host_id.clone(), guest.player_id.clone()).match_id.clone();
        let mut effects = Vec::with_capacity(2);
        if let Some(host) = self.registry.player_mut(&host_id) {
            host.status = PlayerStatus::InMatch;
            effects.push(RelayEffect::Notify {
                connection_id: host.connection_id,
                notice: Notice::MatchFound {
                    match_id: match_id.clone(),
                    role: Role::Host,
                    opponent: OpponentInfo::from(&guest),
                },
            });
            effects.push(RelayEffect::Notify {
                connection_id,
                notice: Notice::MatchFound {
                    match_id,
                    role: Role::Guest,
                    opponent: OpponentInfo::from(&*host),
                },
            });
        }
        if let Some(guest) = self.registry.player_mut(&guest.player_id) {
            guest.status = PlayerStatus::InMatch;
        }
        Ok(effects)
    }

    /// Voluntary exit. The player record is destroyed but the connection stays
    /// registered and may join again as a new player.
    pub fn leave(
        &mut self,
        connection_id: ConnectionId,
    ) -> Result<Vec<RelayEffect>, RelayError> {
        let player_id = self.bound_player(connection_id)?.clone();
        let effects = self.withdraw(&player_id);
        self.registry.unbind(connection_id);
        Ok(effects)
    }

    /// Forwards an opaque signaling frame to the sender's opponent.
    pub fn relay(
        &self,
        connection_id: ConnectionId,
        signal: Signal,
    ) -> Result<Vec<RelayEffect>, RelayError> {
        let player_id = self.bound_player(connection_id)?;
        let opponent = self
            .matches
            .match_of(player_id)
            .and_then(|m| m.opponent_of(player_id))
            .and_then(|opponent_id| self.registry.player(opponent_id))
            .ok_or_else(|| RelayError::NotInMatch(player_id.clone()))?;

        Ok(vec![RelayEffect::Forward {
            connection_id: opponent.connection_id,
            frame: signal.forwarded(player_id),
        }])
    }

    /// Transport closed. Unknown or already-closed connections produce nothing.
    pub fn disconnect(
        &mut self,
        connection_id: ConnectionId,
    ) -> Vec<RelayEffect> {
        let effects = match self.registry.player_id_of(connection_id).cloned() {
            Some(player_id) => self.withdraw(&player_id),
            None => Vec::new(),
        };
        self.registry.deregister(connection_id);
        effects
    }

    /// Marks a match as confirmed by the peers. Nothing on the wire triggers
    /// this; it is left to whoever embeds the relay.
    pub fn confirm_active(
        &mut self,
        match_id: &MatchId,
    ) -> bool {
        self.matches.set_status(match_id, MatchStatus::Active)
    }

    pub fn stats(&self) -> RelayStats {
        RelayStats {
            connections: self.registry.connection_count(),
            players: self.registry.player_count(),
            waiting: self.queue.len(),
            matches: self.matches.len(),
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn queue(&self) -> &WaitingQueue {
        &self.queue
    }

    pub fn matches(&self) -> &MatchTable {
        &self.matches
    }

    fn bound_player(
        &self,
        connection_id: ConnectionId,
    ) -> Result<&PlayerId, RelayError> {
        if !self.registry.is_registered(connection_id) {
            return Err(RelayError::UnknownConnection(connection_id));
        }
        self.registry
            .player_id_of(connection_id)
            .ok_or(RelayError::NotJoined(connection_id))
    }

    /// Skips queue entries whose registry record is gone. Those should not
    /// exist, since every removal purges the queue in the same step.
    fn next_waiting_host(&mut self) -> Option<PlayerId> {
        while let Some(candidate) = self.queue.dequeue_oldest() {
            if self.registry.player(&candidate).is_some() {
                return Some(candidate);
            }
        }
        None
    }

    /// Removes the player from the queue and from any match. An orphaned
    /// opponent is told and unbound, since a match cannot continue one-sided.
    fn withdraw(
        &mut self,
        player_id: &PlayerId,
    ) -> Vec<RelayEffect> {
        self.queue.remove(player_id);

        let Some(ended) = self.matches.match_of(player_id).map(|m| m.match_id.clone()) else {
            return Vec::new();
        };
        let Some(ended) = self.matches.remove(&ended) else {
            return Vec::new();
        };

        let mut effects = Vec::new();
        if let Some(opponent_id) = ended.opponent_of(player_id)
            && let Some(opponent) = self.registry.player(opponent_id)
        {
            let connection_id = opponent.connection_id;
            effects.push(RelayEffect::Notify {
                connection_id,
                notice: Notice::OpponentDisconnected,
            });
            self.registry.unbind(connection_id);
        }
        effects
    }
}
