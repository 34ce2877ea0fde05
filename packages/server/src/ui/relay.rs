//! Per-connection relay state machine.
//!
//! ```text
//! Connecting ──(room found)──▶ Joined ──(history replayed)──▶ Receiving ──▶ Closed
//!     └──────────(room not found: error frame)──────────────────────────────▲
//! ```
//!
//! One `ChatRelay` exists per connection and shares nothing with other relays
//! except through the room repository. `close` always runs, whatever ended the
//! connection, so no subscriber entry outlives its connection.

use std::sync::Arc;

use futures_util::stream::{Stream, StreamExt};

use crate::{
    domain::{ConnectionHandle, LeaveOutcome, OutboundEvent, RoomName},
    infrastructure::dto::websocket::InboundMessage,
    usecase::{
        ConnectError, ConnectParticipantUseCase, DisconnectParticipantUseCase, SendMessageError,
        SendMessageUseCase,
    },
};

use super::state::AppState;

/// Error text sent when the requested room does not exist
pub const ROOM_NOT_FOUND: &str = "Room not found";

/// Error text sent when an inbound payload is not a valid message envelope
pub const INVALID_MESSAGE_FORMAT: &str = "Invalid message format";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Connecting,
    Joined,
    Receiving,
    Closed,
}

/// Transport-agnostic inbound data frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    Text(String),
    Binary(Vec<u8>),
}

pub struct ChatRelay {
    state: RelayState,
    room: Option<RoomName>,
    handle: ConnectionHandle,
    connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    send_message_usecase: Arc<SendMessageUseCase>,
}

impl ChatRelay {
    pub fn new(app_state: &AppState, handle: ConnectionHandle) -> Self {
        Self {
            state: RelayState::Connecting,
            room: None,
            handle,
            connect_participant_usecase: app_state.connect_participant_usecase.clone(),
            disconnect_participant_usecase: app_state.disconnect_participant_usecase.clone(),
            send_message_usecase: app_state.send_message_usecase.clone(),
        }
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    /// The joined room, once `connect` has succeeded
    pub fn room(&self) -> Option<&RoomName> {
        self.room.as_ref()
    }

    /// Join the room and replay its history.
    ///
    /// On success the relay is `Receiving`. On failure a single
    /// `Room not found` error is queued for the client and the relay is
    /// `Closed` without having joined anything.
    pub async fn connect(&mut self, raw_room: &str) -> Result<(), ConnectError> {
        if self.state != RelayState::Connecting {
            return Ok(());
        }

        match self
            .connect_participant_usecase
            .execute(raw_room, self.handle.clone())
            .await
        {
            Ok(joined) => {
                self.state = RelayState::Joined;
                tracing::info!(
                    "Connection '{}' joined room '{}' ({} message(s) replayed)",
                    self.handle.id(),
                    joined.room,
                    joined.replayed
                );
                self.room = Some(joined.room);
                self.state = RelayState::Receiving;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    "Connection '{}' rejected for room '{}': {}",
                    self.handle.id(),
                    raw_room,
                    e
                );
                self.notify_error(ROOM_NOT_FOUND);
                self.state = RelayState::Closed;
                Err(e)
            }
        }
    }

    /// Process inbound frames until the stream ends or the relay stops receiving.
    pub async fn receive<S>(&mut self, inbound: S)
    where
        S: Stream<Item = InboundFrame>,
    {
        let mut inbound = std::pin::pin!(inbound);
        while self.state == RelayState::Receiving {
            match inbound.next().await {
                Some(frame) => self.handle_frame(frame).await,
                None => break,
            }
        }
    }

    async fn handle_frame(&mut self, frame: InboundFrame) {
        let Some(room) = self.room.clone() else {
            return;
        };

        let text = match frame {
            InboundFrame::Text(text) => text,
            InboundFrame::Binary(bytes) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => {
                    tracing::warn!("Received non UTF-8 binary frame from '{}'", self.handle.id());
                    self.notify_error(INVALID_MESSAGE_FORMAT);
                    return;
                }
            },
        };
        tracing::debug!("Received text from '{}': {}", self.handle.id(), text);

        let payload = match serde_json::from_str::<InboundMessage>(&text) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Failed to parse message as JSON: {}", e);
                self.notify_error(INVALID_MESSAGE_FORMAT);
                return;
            }
        };

        match self
            .send_message_usecase
            .execute(&room, payload.user.as_deref(), &payload.content)
            .await
        {
            Ok(_) => {}
            Err(SendMessageError::RoomNotFound) => {
                tracing::warn!(
                    "Room '{}' no longer exists, closing connection '{}'",
                    room,
                    self.handle.id()
                );
                self.state = RelayState::Closed;
            }
        }
    }

    /// Leave the room (a no-op if never joined) and enter the terminal state.
    pub async fn close(&mut self) -> LeaveOutcome {
        let outcome = match self.room.take() {
            Some(room) => {
                self.disconnect_participant_usecase
                    .execute(&room, &self.handle.id())
                    .await
            }
            None => LeaveOutcome::default(),
        };
        if self.state != RelayState::Closed {
            tracing::info!("Connection '{}' closed", self.handle.id());
        }
        self.state = RelayState::Closed;
        outcome
    }

    /// Drive one full traversal of the state machine.
    pub async fn run<S>(mut self, raw_room: &str, inbound: S) -> LeaveOutcome
    where
        S: Stream<Item = InboundFrame>,
    {
        if self.connect(raw_room).await.is_ok() {
            self.receive(inbound).await;
        }
        self.close().await
    }

    fn notify_error(&self, message: &str) {
        if let Err(e) = self.handle.push(OutboundEvent::Error(message.to_string())) {
            tracing::debug!(
                "Could not send error to connection '{}': {}",
                self.handle.id(),
                e
            );
        }
    }
}
