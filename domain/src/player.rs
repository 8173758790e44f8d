use serde::{Deserialize, Serialize};

use crate::{AccountId, ConnectionId, PlayerId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Waiting,
    InMatch,
}

/// Side of a pairing. The host is the player who waited longer and is
/// treated upstream as the authoritative source of shared game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Host,
    Guest,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub player_id: PlayerId,
    pub display_name: String,
    pub account_id: Option<AccountId>,
    pub connection_id: ConnectionId,
    pub status: PlayerStatus,
}

impl Player {
    pub fn new(
        player_id: PlayerId,
        display_name: String,
        account_id: Option<AccountId>,
        connection_id: ConnectionId,
    ) -> Self {
        Self {
            player_id,
            display_name,
            account_id,
            connection_id,
            status: PlayerStatus::Waiting,
        }
    }
}
