//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::ConnectionId,
    infrastructure::dto::websocket::parse_client_event,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let connection_id = ConnectionId::generate();
    ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Frames are written in the order the hub queued them.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Spawns a task that forwards inbound frames from this connection to the hub.
fn receiver_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    connection_id: ConnectionId,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match parse_client_event(text.as_str()) {
                    Ok(event) => {
                        if let Err(e) = state.hub.dispatch(connection_id, event) {
                            tracing::error!("Failed to dispatch frame from '{}': {}", connection_id, e);
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Dropped frame from '{}': {}", connection_id, e);
                    }
                },
                Message::Close(_) => {
                    tracing::info!("Connection '{}' sent close frame", connection_id);
                    break;
                }
                Message::Binary(_) => {
                    tracing::warn!("Dropped binary frame from '{}'", connection_id);
                }
                _ => {}
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let (sender, receiver) = socket.split();

    // Create a channel for this connection to receive frames from the hub
    let (tx, rx) = mpsc::unbounded_channel();
    if let Err(e) = state.hub.connect(connection_id, tx) {
        tracing::error!("Failed to register connection '{}': {}", connection_id, e);
        return;
    }
    tracing::info!("Connection '{}' opened", connection_id);

    let mut send_task = pusher_loop(rx, sender);
    let mut recv_task = receiver_loop(receiver, state.clone(), connection_id);

    // どちらかのタスクが終了したら、もう一方も終了
    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    // 受信タスクの後に送るので、この接続の先行イベントは全て処理済みになる
    if let Err(e) = state.hub.disconnect(connection_id) {
        tracing::warn!("Failed to unregister connection '{}': {}", connection_id, e);
    }
    tracing::info!("Connection '{}' closed", connection_id);
}
