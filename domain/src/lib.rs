mod error;
mod match_table;
mod player;
mod protocol;
mod queue;
mod registry;
mod relay;
mod types;

pub use error::RelayError;
pub use match_table::{Match, MatchStatus, MatchTable};
pub use player::{Player, PlayerStatus, Role};
pub use protocol::{ClientMessage, JoinRequest, Notice, OpponentInfo, ServerMessage, Signal, SignalKind};
pub use queue::WaitingQueue;
pub use registry::ConnectionRegistry;
pub use relay::{RelayEffect, RelayState, RelayStats};
pub use types::{AccountId, ConnectionId, MatchId, PlayerId};
