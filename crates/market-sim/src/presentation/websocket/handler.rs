use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::application::ports::MarketPublisher;
use crate::infrastructure::BroadcastMarketPublisher;

/// WebSocket connection state
pub struct WsState {
    pub publisher: Arc<BroadcastMarketPublisher>,
}

/// Handle WebSocket upgrade
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<WsState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Push one SNAPSHOT, then every UPDATE until either side goes away.
///
/// The stream is one-way; inbound frames are read only to notice a close.
async fn handle_socket(socket: WebSocket, state: Arc<WsState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut subscription = state.publisher.subscribe();
    debug!(
        generation = subscription.snapshot().generation,
        subscribers = state.publisher.subscriber_count(),
        "market subscriber connected"
    );

    let mut send_task = tokio::spawn(async move {
        match subscription.snapshot().to_json() {
            Ok(json) => {
                if sender.send(Message::Text(json.into())).await.is_err() {
                    return;
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to encode market snapshot");
                return;
            }
        }

        while let Some(update) = subscription.next_update().await {
            let json = match update.to_json() {
                Ok(json) => json,
                Err(e) => {
                    warn!(generation = update.generation, error = %e, "failed to encode market update");
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    debug!(
        subscribers = state.publisher.subscriber_count(),
        "market subscriber disconnected"
    );
}
