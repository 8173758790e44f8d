use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{AccountId, MatchId, Player, PlayerId, Role};

pub const WAITING_OPPONENT_TEXT: &str = "Waiting for an opponent...";

/// Frames a client may send, decoded once at the transport boundary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    JoinMatchmaking(JoinRequest),
    LeaveMatchmaking,
    WebrtcOffer(Map<String, Value>),
    WebrtcAnswer(Map<String, Value>),
    WebrtcIceCandidate(Map<String, Value>),
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Splits a signaling frame into its kind and opaque body. Other frames yield `None`.
    pub fn into_signal(self) -> Option<Signal> {
        let (kind, payload) = match self {
            ClientMessage::WebrtcOffer(payload) => (SignalKind::Offer, payload),
            ClientMessage::WebrtcAnswer(payload) => (SignalKind::Answer, payload),
            ClientMessage::WebrtcIceCandidate(payload) => (SignalKind::IceCandidate, payload),
            _ => return None,
        };
        Some(Signal { kind, payload })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub player_id: PlayerId,
    pub username: String,
    #[serde(default)]
    pub user_id: Option<AccountId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl SignalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalKind::Offer => "webrtc_offer",
            SignalKind::Answer => "webrtc_answer",
            SignalKind::IceCandidate => "webrtc_ice_candidate",
        }
    }
}

/// Opaque signaling body (SDP offer/answer or ICE candidate). Never inspected.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub kind: SignalKind,
    pub payload: Map<String, Value>,
}

impl Signal {
    /// Rebuilds the frame for the opponent: original fields, the `type` tag and `fromId`.
    pub fn forwarded(
        self,
        from: &PlayerId,
    ) -> Map<String, Value> {
        let mut frame = self.payload;
        frame.insert("type".to_owned(), Value::String(self.kind.as_str().to_owned()));
        frame.insert("fromId".to_owned(), Value::String(from.0.clone()));
        frame
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpponentInfo {
    pub id: PlayerId,
    pub username: String,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<AccountId>,
}

impl From<&Player> for OpponentInfo {
    fn from(player: &Player) -> Self {
        Self {
            id: player.player_id.clone(),
            username: player.display_name.clone(),
            user_id: player.account_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notice {
    WaitingOpponent {
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    MatchFound {
        match_id: MatchId,
        role: Role,
        opponent: OpponentInfo,
    },
    OpponentDisconnected,
}

impl Notice {
    pub fn waiting_opponent() -> Self {
        Notice::WaitingOpponent {
            message: WAITING_OPPONENT_TEXT.to_owned(),
        }
    }
}

/// Frames the server sends.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ServerMessage {
    Notice(Notice),
    Signal(Map<String, Value>),
}

impl ServerMessage {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<Notice> for ServerMessage {
    fn from(notice: Notice) -> Self {
        ServerMessage::Notice(notice)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_join_with_and_without_account() {
        let msg = ClientMessage::decode(r#"{"type":"join_matchmaking","playerId":"a","username":"Alice","userId":42}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::JoinMatchmaking(JoinRequest {
                player_id: "a".into(),
                username: "Alice".into(),
                user_id: Some(42),
            })
        );

        let msg = ClientMessage::decode(r#"{"type":"join_matchmaking","playerId":"g","username":"Guest"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::JoinMatchmaking(JoinRequest { user_id: None, .. })));
    }

    #[test]
    fn signaling_body_is_kept_without_the_tag() {
        let msg = ClientMessage::decode(r#"{"type":"webrtc_ice_candidate","candidate":{"sdpMid":"0"}}"#).unwrap();
        let signal = msg.into_signal().unwrap();

        assert_eq!(signal.kind, SignalKind::IceCandidate);
        assert_eq!(Value::Object(signal.payload), json!({"candidate": {"sdpMid": "0"}}));
    }

    #[test]
    fn unknown_type_decodes_to_unknown() {
        let msg = ClientMessage::decode(r#"{"type":"chat","text":"hi"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Unknown);
        assert!(msg.into_signal().is_none());
    }

    #[test]
    fn malformed_frames_fail_to_decode() {
        assert!(ClientMessage::decode("not json").is_err());
        assert!(ClientMessage::decode(r#"{"playerId":"a"}"#).is_err());
        assert!(ClientMessage::decode(r#"{"type":"join_matchmaking"}"#).is_err());
    }

    #[test]
    fn forwarded_signal_carries_sender() {
        let signal = ClientMessage::decode(r#"{"type":"webrtc_offer","sdp":"X","fromId":"spoofed"}"#)
            .unwrap()
            .into_signal()
            .unwrap();

        let frame = signal.forwarded(&"a".into());
        assert_eq!(Value::Object(frame), json!({"type": "webrtc_offer", "sdp": "X", "fromId": "a"}));
    }

    #[test]
    fn match_found_wire_shape() {
        let msg = ServerMessage::from(Notice::MatchFound {
            match_id: MatchId("m1".into()),
            role: Role::Host,
            opponent: OpponentInfo {
                id: "b".into(),
                username: "Bob".into(),
                user_id: None,
            },
        });

        let value: Value = serde_json::from_str(&msg.encode().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"type": "match_found", "matchId": "m1", "role": "host", "opponent": {"id": "b", "username": "Bob"}})
        );
    }

    #[test]
    fn notices_wire_shape() {
        let waiting = serde_json::to_value(ServerMessage::from(Notice::waiting_opponent())).unwrap();
        assert_eq!(waiting, json!({"type": "waiting_opponent", "message": WAITING_OPPONENT_TEXT}));

        let gone = serde_json::to_value(ServerMessage::from(Notice::OpponentDisconnected)).unwrap();
        assert_eq!(gone, json!({"type": "opponent_disconnected"}));
    }
}
