//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    domain::{RepositoryError, RoomId, UserId},
    infrastructure::dto::{
        http::{CreateRoomRequest, HistoryQuery, PresenceDto, RoomDto},
        websocket::OutboundMessage,
    },
    ui::state::AppState,
    usecase::{GetPresenceError, RoomUseCaseError},
};

use super::AuthenticatedUser;

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "connections": state.registry.len().await,
    }))
}

/// Newest messages across all rooms
pub async fn get_history(
    _user: AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<OutboundMessage>>, StatusCode> {
    let messages = state
        .get_history_usecase
        .recent(query.effective_limit())
        .await
        .map_err(internal_error)?;

    // Domain Model から DTO への変換
    Ok(Json(messages.into_iter().map(OutboundMessage::from).collect()))
}

/// Newest messages in one room
pub async fn get_room_history(
    _user: AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<OutboundMessage>>, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    let messages = state
        .get_history_usecase
        .recent_in_room(&room_id, query.effective_limit())
        .await
        .map_err(internal_error)?;

    Ok(Json(messages.into_iter().map(OutboundMessage::from).collect()))
}

/// Users currently online
pub async fn get_online_presence(
    _user: AuthenticatedUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PresenceDto>>, StatusCode> {
    let presence = state
        .get_presence_usecase
        .online()
        .await
        .map_err(presence_error)?;

    Ok(Json(presence.into_iter().map(PresenceDto::from).collect()))
}

/// Latest presence of one user
pub async fn get_presence(
    _user: AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<PresenceDto>, StatusCode> {
    let user_id = UserId::new(user_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    let presence = state
        .get_presence_usecase
        .get(&user_id)
        .await
        .map_err(presence_error)?;

    Ok(Json(PresenceDto::from(presence)))
}

/// Get list of rooms
pub async fn get_rooms(
    _user: AuthenticatedUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RoomDto>>, StatusCode> {
    let rooms = state.get_rooms_usecase.list().await.map_err(room_error)?;
    Ok(Json(rooms.into_iter().map(RoomDto::from).collect()))
}

/// Create a room owned by the caller
pub async fn create_room(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomDto>), StatusCode> {
    let room = state
        .create_room_usecase
        .execute(&user_id, request.name, request.members)
        .await
        .map_err(room_error)?;

    Ok((StatusCode::CREATED, Json(RoomDto::from(room))))
}

/// Get room detail by ID
pub async fn get_room_detail(
    _user: AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDto>, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::NOT_FOUND)?;
    let room = state
        .get_rooms_usecase
        .detail(&room_id)
        .await
        .map_err(room_error)?;

    Ok(Json(RoomDto::from(room)))
}

/// Add the caller to a room's members
pub async fn join_room(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::NOT_FOUND)?;
    state
        .room_membership_usecase
        .join(&room_id, &user_id)
        .await
        .map_err(room_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Remove the caller from a room's members
pub async fn leave_room(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::NOT_FOUND)?;
    state
        .room_membership_usecase
        .leave(&room_id, &user_id)
        .await
        .map_err(room_error)?;

    Ok(StatusCode::NO_CONTENT)
}

fn internal_error(error: RepositoryError) -> StatusCode {
    tracing::error!("repository error: {}", error);
    StatusCode::INTERNAL_SERVER_ERROR
}

fn presence_error(error: GetPresenceError) -> StatusCode {
    match error {
        GetPresenceError::NotFound(_) => StatusCode::NOT_FOUND,
        GetPresenceError::Repository(e) => internal_error(e),
    }
}

fn room_error(error: RoomUseCaseError) -> StatusCode {
    match error {
        RoomUseCaseError::InvalidName | RoomUseCaseError::InvalidInput(_) => {
            StatusCode::BAD_REQUEST
        }
        RoomUseCaseError::RoomNotFound(_) => StatusCode::NOT_FOUND,
        RoomUseCaseError::Repository(e) => internal_error(e),
    }
}
