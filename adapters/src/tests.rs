use std::sync::Arc;

use serde_json::{Value, json};

use application::ports::in_::MatchmakingService;
use domain::{ClientMessage, ConnectionId, MatchId};

use crate::InMemoryNotifier;

struct Relay {
    service: MatchmakingService,
    notifier: Arc<InMemoryNotifier>,
}

impl Relay {
    fn new() -> Self {
        let notifier = Arc::new(InMemoryNotifier::new());
        Self {
            service: MatchmakingService::new(notifier.clone()),
            notifier,
        }
    }

    /// Feeds a raw text frame through the same decode-then-dispatch path as the socket handler.
    async fn send(
        &mut self,
        connection_id: ConnectionId,
        frame: &str,
    ) {
        if let Ok(message) = ClientMessage::decode(frame) {
            let _ = self.service.dispatch(connection_id, message).await;
        }
    }

    async fn join(
        &mut self,
        player_id: &str,
    ) -> ConnectionId {
        let connection_id = self.service.connect();
        let frame = json!({"type": "join_matchmaking", "playerId": player_id, "username": player_id}).to_string();
        self.send(connection_id, &frame).await;
        connection_id
    }

    fn received(
        &self,
        connection_id: ConnectionId,
    ) -> Vec<Value> {
        self.notifier
            .delivered_to(connection_id)
            .into_iter()
            .map(|m| serde_json::to_value(m).unwrap())
            .collect()
    }
}

#[tokio::test]
async fn scenario_first_player_waits() {
    let mut relay = Relay::new();
    let a = relay.join("a").await;

    let received = relay.received(a);
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["type"], "waiting_opponent");
}

#[tokio::test]
async fn scenario_second_player_is_matched() {
    let mut relay = Relay::new();
    let a = relay.join("a").await;
    let b = relay.join("b").await;

    let to_a = relay.received(a);
    let to_b = relay.received(b);
    assert_eq!(to_a[1]["type"], "match_found");
    assert_eq!(to_a[1]["role"], "host");
    assert_eq!(to_a[1]["opponent"]["id"], "b");
    assert_eq!(to_b[0]["type"], "match_found");
    assert_eq!(to_b[0]["role"], "guest");
    assert_eq!(to_b[0]["opponent"]["id"], "a");

    let match_id = to_a[1]["matchId"].as_str().unwrap();
    assert!(!match_id.is_empty());
    assert_eq!(to_b[0]["matchId"], match_id);
}

#[tokio::test]
async fn scenario_offer_is_relayed_with_sender() {
    let mut relay = Relay::new();
    let a = relay.join("a").await;
    let b = relay.join("b").await;
    relay.notifier.clear();

    relay.send(a, r#"{"type":"webrtc_offer","sdp":"X"}"#).await;

    assert_eq!(relay.received(b), vec![json!({"type": "webrtc_offer", "sdp": "X", "fromId": "a"})]);
    assert!(relay.received(a).is_empty());
}

#[tokio::test]
async fn scenario_guest_disconnect_tears_down_match() {
    let mut relay = Relay::new();
    let a = relay.join("a").await;
    let b = relay.join("b").await;
    let match_id = MatchId(relay.received(b)[0]["matchId"].as_str().unwrap().to_owned());
    relay.notifier.clear();

    relay.service.disconnect(b).await;
    assert_eq!(relay.received(a), vec![json!({"type": "opponent_disconnected"})]);
    assert!(relay.service.state().matches().get(&match_id).is_none());

    relay.notifier.clear();
    relay.send(a, r#"{"type":"webrtc_offer","sdp":"X"}"#).await;
    assert!(relay.notifier.delivered().is_empty());
}

#[tokio::test]
async fn scenario_leave_removes_player_from_queue() {
    let mut relay = Relay::new();
    let c = relay.join("c").await;
    relay.send(c, r#"{"type":"leave_matchmaking"}"#).await;

    let d = relay.join("d").await;
    let to_d = relay.received(d);
    assert_eq!(to_d.len(), 1);
    assert_eq!(to_d[0]["type"], "waiting_opponent");
    assert_eq!(relay.received(c).len(), 1);
}

#[tokio::test]
async fn signals_never_cross_matches() {
    let mut relay = Relay::new();
    let a = relay.join("a").await;
    let b = relay.join("b").await;
    let c = relay.join("c").await;
    let d = relay.join("d").await;
    relay.notifier.clear();

    relay.send(b, r#"{"type":"webrtc_ice_candidate","candidate":"cand-b"}"#).await;
    relay.send(c, r#"{"type":"webrtc_answer","sdp":"ans-c"}"#).await;

    assert_eq!(
        relay.received(a),
        vec![json!({"type": "webrtc_ice_candidate", "candidate": "cand-b", "fromId": "b"})]
    );
    assert_eq!(relay.received(d), vec![json!({"type": "webrtc_answer", "sdp": "ans-c", "fromId": "c"})]);
    assert!(relay.received(b).is_empty());
    assert!(relay.received(c).is_empty());
}

#[tokio::test]
async fn malformed_and_unknown_frames_change_nothing() {
    let mut relay = Relay::new();
    let a = relay.join("a").await;
    relay.notifier.clear();

    relay.send(a, "{not json").await;
    relay.send(a, r#"{"type":"spectate","room":"1"}"#).await;
    relay.send(a, r#"{"playerId":"x"}"#).await;

    assert!(relay.notifier.delivered().is_empty());
    assert_eq!(relay.service.stats().waiting, 1);
}

#[tokio::test]
async fn closed_opponent_socket_does_not_block_cleanup() {
    let mut relay = Relay::new();
    let a = relay.join("a").await;
    let b = relay.join("b").await;
    relay.notifier.close(a);

    relay.service.disconnect(b).await;
    relay.service.disconnect(a).await;

    assert_eq!(relay.service.stats().connections, 0);
    assert!(relay.service.state().matches().is_empty());
}
