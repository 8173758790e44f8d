use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::ports::out_::RelayNotifier;
use domain::{ClientMessage, ConnectionId, MatchId, Notice, RelayEffect, RelayError, RelayState, RelayStats};

/// Entry point for every transport event: connection opened, frame received,
/// connection closed.
///
/// All state changes for an event are applied to [`RelayState`] before any
/// notification is delivered, so nothing is left half-updated across an await.
pub struct MatchmakingService {
    state: RelayState,
    notifier: Arc<dyn RelayNotifier>,
}

impl MatchmakingService {
    pub fn new(notifier: Arc<dyn RelayNotifier>) -> Self {
        Self {
            state: RelayState::new(),
            notifier,
        }
    }

    pub fn connect(&mut self) -> ConnectionId {
        let connection_id = self.state.connect();
        info!(connection_id = %connection_id, "Connection registered");
        connection_id
    }

    /// Routes one decoded frame. Protocol violations come back as errors for
    /// the caller to log; nothing is ever sent back to the offender.
    pub async fn dispatch(
        &mut self,
        connection_id: ConnectionId,
        message: ClientMessage,
    ) -> Result<(), RelayError> {
        let effects = match message {
            ClientMessage::JoinMatchmaking(request) => {
                let player_id = request.player_id.clone();
                match self.state.join(connection_id, request) {
                    Ok(effects) => {
                        info!(connection_id = %connection_id, player_id = %player_id, "Player joined matchmaking");
                        effects
                    }
                    Err(err) => {
                        warn!(connection_id = %connection_id, player_id = %player_id, error = %err, "Join ignored");
                        return Err(err);
                    }
                }
            }
            ClientMessage::LeaveMatchmaking => match self.state.leave(connection_id) {
                Ok(effects) => {
                    info!(connection_id = %connection_id, "Player left matchmaking");
                    effects
                }
                Err(err) => {
                    warn!(connection_id = %connection_id, error = %err, "Leave ignored");
                    return Err(err);
                }
            },
            ClientMessage::Unknown => {
                debug!(connection_id = %connection_id, "Ignoring message of unknown type");
                return Ok(());
            }
            signaling => {
                let Some(signal) = signaling.into_signal() else {
                    return Ok(());
                };
                let kind = signal.kind.as_str();
                match self.state.relay(connection_id, signal) {
                    Ok(effects) => effects,
                    Err(err) => {
                        debug!(connection_id = %connection_id, kind, error = %err, "Dropping signal");
                        return Err(err);
                    }
                }
            }
        };

        self.deliver(effects).await;
        Ok(())
    }

    /// Unwinds whatever the closed connection was part of. Safe to call more than once.
    pub async fn disconnect(
        &mut self,
        connection_id: ConnectionId,
    ) {
        let effects = self.state.disconnect(connection_id);
        info!(connection_id = %connection_id, notified = effects.len(), "Connection closed");
        self.deliver(effects).await;
    }

    pub fn confirm_active(
        &mut self,
        match_id: &MatchId,
    ) -> bool {
        self.state.confirm_active(match_id)
    }

    pub fn stats(&self) -> RelayStats {
        self.state.stats()
    }

    pub fn state(&self) -> &RelayState {
        &self.state
    }

    async fn deliver(
        &self,
        effects: Vec<RelayEffect>,
    ) {
        for effect in effects {
            if let RelayEffect::Notify {
                connection_id,
                notice: Notice::MatchFound { match_id, role, .. },
            } = &effect
            {
                info!(connection_id = %connection_id, match_id = %match_id, role = ?role, "Match found");
            }

            let (connection_id, message) = effect.into_message();
            if !self.notifier.notify(connection_id, message).await {
                warn!(connection_id = %connection_id, "Notification not delivered");
            }
        }
    }
}
