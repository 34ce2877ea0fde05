//! WebSocket connection handlers.

use std::{fmt::Display, sync::Arc, time::Duration};

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    future,
    sink::{Sink, SinkExt},
    stream::{SplitStream, Stream, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionHandle, OutboundEvent},
    infrastructure::{dto::websocket::OutboundMessage, message_pusher::WebSocketMessagePusher},
    ui::{
        relay::{ChatRelay, InboundFrame},
        state::AppState,
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, room))
}

/// Spawns a task that receives events from the rx channel and writes them to the WebSocket sender.
///
/// Every write is bounded by `send_timeout`. The task ends when the channel
/// closes (all handles dropped), after sending a Close frame, or as soon as a
/// write fails or times out.
///
/// # Arguments
///
/// * `rx` - Channel receiver for events queued by the room
/// * `sender` - Sink for this client's WebSocket frames
/// * `send_timeout` - Upper bound for a single write
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop<S>(
    mut rx: mpsc::UnboundedReceiver<OutboundEvent>,
    mut sender: S,
    send_timeout: Duration,
) -> JoinHandle<()>
where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: Display,
{
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match serde_json::to_string(&OutboundMessage::from(event)) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize outbound message: {}", e);
                    continue;
                }
            };

            match tokio::time::timeout(send_timeout, sender.send(Message::Text(json.into()))).await
            {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::debug!("Failed to write to WebSocket: {}", e);
                    return;
                }
                Err(_) => {
                    tracing::warn!(
                        "WebSocket write timed out after {:?}, dropping slow client",
                        send_timeout
                    );
                    return;
                }
            }
        }

        let _ = tokio::time::timeout(send_timeout, sender.send(Message::Close(None))).await;
    })
}

/// Adapt the WebSocket receive half into data frames, ending on Close or error.
fn inbound_frames(receiver: SplitStream<WebSocket>) -> impl Stream<Item = InboundFrame> {
    receiver
        .take_while(|msg| {
            let open = match msg {
                Ok(Message::Close(_)) => {
                    tracing::debug!("Client requested close");
                    false
                }
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!("WebSocket error: {}", e);
                    false
                }
            };
            future::ready(open)
        })
        .filter_map(|msg| {
            future::ready(match msg {
                Ok(Message::Text(text)) => Some(InboundFrame::Text(text.as_str().to_owned())),
                Ok(Message::Binary(bytes)) => Some(InboundFrame::Binary(bytes.to_vec())),
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => None,
            })
        })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, raw_room: String) {
    let (sender, receiver) = socket.split();
    serve_connection(state, raw_room, sender, inbound_frames(receiver)).await;
}

/// Run one connection to completion over any frame sink and inbound stream.
///
/// The room is always left before returning. Once the relay is closed the
/// writer gets `send_timeout` to flush what is queued and is aborted after that.
async fn serve_connection<Si, St>(state: Arc<AppState>, raw_room: String, sender: Si, inbound: St)
where
    Si: Sink<Message> + Unpin + Send + 'static,
    Si::Error: Display,
    St: Stream<Item = InboundFrame>,
{
    let (pusher, rx) = WebSocketMessagePusher::channel();
    let handle = ConnectionHandle::new(Arc::new(pusher));
    let connection_id = handle.id();
    tracing::info!(
        "Connection '{}' opened for room '{}'",
        connection_id,
        raw_room
    );

    // Spawn a task to write queued events to this client
    let mut send_task = pusher_loop(rx, sender, state.send_timeout);
    let mut writer_finished = false;

    let mut relay = ChatRelay::new(&state, handle);
    if relay.connect(&raw_room).await.is_ok() {
        // If either side stops, the connection is over
        tokio::select! {
            _ = relay.receive(inbound) => {
                tracing::debug!("Connection '{}' receive loop ended", connection_id);
            }
            _ = &mut send_task => {
                writer_finished = true;
                tracing::debug!("Connection '{}' writer ended", connection_id);
            }
        }
    }

    relay.close().await;
    // Dropping the last handle closes the queue so the writer can flush and exit
    drop(relay);

    if !writer_finished
        && tokio::time::timeout(state.send_timeout, &mut send_task)
            .await
            .is_err()
    {
        tracing::debug!("Connection '{}' writer aborted", connection_id);
        send_task.abort();
    }
    tracing::info!("Connection '{}' released", connection_id);
}
