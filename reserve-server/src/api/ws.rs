//! WebSocket handler for real-time reservation updates
//!
//! Clients connect with a connection-time credential (Authorization header
//! or `?token=` for browsers), then join channels:
//!
//! - `joinReservation {reservation_id}` — owner or staff/admin only
//! - `joinStaff` — staff/admin only
//!
//! Authorization is re-validated against the store on every join; a refused
//! join yields an `error` event and no membership. Membership is held
//! in-process and must be re-established after a reconnect.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use shared::ws::{ClientEvent, ServerEvent};

use crate::auth::{CurrentUser, JwtService};
use crate::core::AppState;
use crate::db::repository::reservation;
use crate::notify::{NotifyHub, Room};
use crate::utils::AppError;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Browser clients cannot set headers on WebSocket requests
    pub token: Option<String>,
}

/// GET /api/ws — upgrade to WebSocket
pub async fn handle_ws(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, AppError> {
    let header_token = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header)
        .map(str::to_owned);

    let token = header_token
        .or(query.token)
        .ok_or_else(AppError::unauthorized)?;

    let claims = state.jwt.validate_token(&token).map_err(|e| match e {
        crate::auth::JwtError::ExpiredToken => AppError::token_expired(),
        _ => AppError::invalid_token("Invalid token"),
    })?;
    let user = CurrentUser::try_from(claims)
        .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {e}")))?;

    Ok(ws.on_upgrade(move |socket| handle_connection(socket, state, user)))
}

async fn handle_connection(socket: WebSocket, state: AppState, user: CurrentUser) {
    let (mut ws_sink, mut ws_stream) = socket.split();

    // Outbound queue: room broadcasts and join replies share it
    let (tx, mut rx) = NotifyHub::channel();
    let reply_tx = tx.clone();
    let conn_id = state.notify.register(tx);

    tracing::info!(user_id = user.id, %conn_id, "WebSocket connected");

    loop {
        tokio::select! {
            Some(event) = rx.recv() => {
                let Ok(json) = serde_json::to_string(&event) else {
                    continue;
                };
                if ws_sink.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            incoming = ws_stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let reply = match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => handle_client_event(&state, &user, conn_id, event).await,
                        Err(_) => ServerEvent::Error {
                            message: "Unrecognized message".to_string(),
                        },
                    };
                    // Replies ride the same queue as broadcasts
                    let _ = reply_tx.send(reply).await;
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {} // ping/pong/binary — nothing to do
                Some(Err(e)) => {
                    tracing::warn!(user_id = user.id, "WebSocket error: {e}");
                    break;
                }
            }
        }
    }

    state.notify.unregister(conn_id);
    tracing::info!(user_id = user.id, %conn_id, "WebSocket disconnected");
}

/// Process one client event, returning the reply to send back
async fn handle_client_event(
    state: &AppState,
    user: &CurrentUser,
    conn_id: crate::notify::ConnId,
    event: ClientEvent,
) -> ServerEvent {
    match event {
        ClientEvent::JoinReservation { reservation_id } => {
            let found = match reservation::find_by_id(&state.db.pool, reservation_id).await {
                Ok(found) => found,
                Err(e) => {
                    tracing::error!(reservation_id, "Join lookup failed: {e}");
                    return ServerEvent::Error {
                        message: "Internal error".to_string(),
                    };
                }
            };
            match found {
                Some(r) if r.user_id == user.id || user.role.is_staff() => {
                    let room = Room::Reservation(reservation_id);
                    state.notify.join(conn_id, room);
                    ServerEvent::Joined {
                        room: room.to_string(),
                    }
                }
                Some(_) => {
                    tracing::warn!(
                        user_id = user.id,
                        reservation_id,
                        "Refused reservation channel join"
                    );
                    ServerEvent::Error {
                        message: "Not allowed to join this reservation channel".to_string(),
                    }
                }
                None => ServerEvent::Error {
                    message: format!("Reservation {reservation_id} not found"),
                },
            }
        }
        ClientEvent::JoinStaff => {
            if user.role.is_staff() {
                state.notify.join(conn_id, Room::Staff);
                ServerEvent::Joined {
                    room: Room::Staff.to_string(),
                }
            } else {
                tracing::warn!(user_id = user.id, "Refused staff channel join");
                ServerEvent::Error {
                    message: "Staff role required".to_string(),
                }
            }
        }
    }
}
