use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use domain::{ClientMessage, ConnectionId};

use crate::web::state::AppState;

pub async fn handle_connection(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        let connection_id = state.matchmaking_service.lock().await.connect();
        info!(connection_id = %connection_id, "Client connected");

        let (sender, receiver) = socket.split();
        let outbound = state.notifier.register(connection_id).await;
        let writer = tokio::spawn(write_frames(connection_id, sender, outbound));

        handle_messages(connection_id, receiver, &state).await;

        info!(connection_id = %connection_id, "Client disconnected");
        state.matchmaking_service.lock().await.disconnect(connection_id).await;
        state.notifier.unregister(connection_id).await;
        let _ = writer.await;
    })
}

async fn write_frames(
    connection_id: ConnectionId,
    mut sender: SplitSink<WebSocket, Message>,
    mut outbound: mpsc::Receiver<String>,
) {
    while let Some(frame) = outbound.recv().await {
        if let Err(e) = sender.send(Message::Text(frame.into())).await {
            debug!(connection_id = %connection_id, error = %e, "Socket write failed");
            break;
        }
    }
}

async fn handle_messages(
    connection_id: ConnectionId,
    mut receiver: SplitStream<WebSocket>,
    state: &AppState,
) {
    while let Some(Ok(message)) = receiver.next().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            Message::Binary(_) => {
                warn!(connection_id = %connection_id, "Ignoring binary frame");
                continue;
            }
            _ => continue,
        };
        debug!(connection_id = %connection_id, message = %text.as_str(), "<- Received");

        match ClientMessage::decode(text.as_str()) {
            Ok(incoming) => {
                let mut matchmaking = state.matchmaking_service.lock().await;
                if let Err(e) = matchmaking.dispatch(connection_id, incoming).await {
                    debug!(connection_id = %connection_id, error = %e, "Message ignored");
                }
            }
            Err(e) => {
                warn!(connection_id = %connection_id, error = %e, "Failed to parse message");
            }
        }
    }
}
