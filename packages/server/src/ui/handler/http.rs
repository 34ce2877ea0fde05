//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};

use crate::{
    infrastructure::dto::http::{
        CreateRoomRequestDto, CreatedRoomDto, ErrorDto, RoomDetailDto, RoomListDto,
        RoomMessagesDto,
    },
    ui::state::AppState,
    usecase::{CreateRoomError, GetRoomDetailError, GetRoomMessagesError},
};

/// Header carrying the requesting user's name, consulted by the room-creation policy
pub const USER_HEADER: &str = "x-hiroba-user";

/// Error text for a room-creation body that is missing or not `{"name": string}`
pub const INVALID_REQUEST_BODY: &str = "Invalid request body";

type ApiError = (StatusCode, Json<ErrorDto>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorDto::new(message)))
}

/// Index banner
pub async fn index() -> &'static str {
    "Hiroba - Real-Time Chat Relay"
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<RoomListDto> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(RoomListDto::from(rooms))
}

/// Create a room
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Result<Json<CreateRoomRequestDto>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedRoomDto>), ApiError> {
    let Json(request) = request.map_err(|rejection| {
        tracing::warn!("Rejected room creation body: {}", rejection.body_text());
        api_error(StatusCode::BAD_REQUEST, INVALID_REQUEST_BODY)
    })?;
    let requester = headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok());

    match state
        .create_room_usecase
        .execute(&request.name, requester)
        .await
    {
        Ok(room) => Ok((
            StatusCode::CREATED,
            Json(CreatedRoomDto {
                room: room.into_string(),
            }),
        )),
        Err(e @ CreateRoomError::AlreadyExists) | Err(e @ CreateRoomError::InvalidName) => {
            tracing::warn!("Room creation for '{}' declined: {}", request.name, e);
            Err(api_error(StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(e @ CreateRoomError::Unauthorized) => {
            Err(api_error(StatusCode::UNAUTHORIZED, e.to_string()))
        }
    }
}

/// Get room detail by name
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<Json<RoomDetailDto>, ApiError> {
    match state.get_room_detail_usecase.execute(&room).await {
        // Domain Model から DTO への変換
        Ok(room) => Ok(Json(RoomDetailDto::from(&room))),
        Err(e @ GetRoomDetailError::RoomNotFound) => {
            Err(api_error(StatusCode::NOT_FOUND, e.to_string()))
        }
    }
}

/// Get the most recent messages of a room
pub async fn get_room_messages(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<Json<RoomMessagesDto>, ApiError> {
    match state.get_room_messages_usecase.execute(&room).await {
        Ok(messages) => Ok(Json(RoomMessagesDto::from(messages))),
        Err(e @ GetRoomMessagesError::RoomNotFound) => {
            Err(api_error(StatusCode::NOT_FOUND, e.to_string()))
        }
    }
}
