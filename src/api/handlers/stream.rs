//! WebSocket subscriber endpoint
//!
//! Upgrades the connection, registers it with the broadcaster, and pumps
//! enriched events out until the client disconnects or falls behind.

use crate::api::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};

pub async fn stream_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let mut subscription = state.broadcaster.subscribe();
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            payload = subscription.recv() => match payload {
                Some(json) => {
                    if sender.send(Message::Text(json.to_string())).await.is_err() {
                        // Transport failed mid-write; the subscriber just
                        // goes away, nobody else is affected
                        break;
                    }
                }
                // Dropped by the broadcaster (queue overflow): close silently
                None => break,
            },
            inbound = receiver.next() => match inbound {
                // Clients may send keepalive text; it carries no meaning
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(_)) => break,
            },
        }
    }

    state.broadcaster.unsubscribe(subscription.id());
}
