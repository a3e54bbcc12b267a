//! WebSocket entrypoint for live viewers.
//!
//! Each connection becomes one registered viewer: it gets `init`, then every delta,
//! until either side goes away.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::server::GatewayState;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<GatewayState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

async fn handle_connection(socket: WebSocket, state: GatewayState) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Arc<str>>(state.viewer_buffer());

    let Some(viewer) = state.dashboard.subscribe(tx).await else {
        warn!("Viewer dropped before initial snapshot");
        return;
    };
    let viewers = state.dashboard.viewer_count().await;
    info!(viewer = %viewer, viewers, "Dashboard viewer connected");

    // Ends when the socket fails or the registry drops this viewer's sender.
    let mut send_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sender.send(Message::Text(payload.to_string())).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    });

    // Viewers are read-only; inbound frames only matter for detecting close.
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "WebSocket error");
                    break;
                }
            }
        }
    });

    // If either task exits, abort the other.
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    }

    state.dashboard.unsubscribe(&viewer).await;
    let viewers = state.dashboard.viewer_count().await;
    info!(viewer = %viewer, viewers, "Dashboard viewer disconnected");
}
