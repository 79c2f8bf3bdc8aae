//! 实时通知中心
//!
//! In-process pub/sub over named rooms. Each WebSocket connection registers
//! an mpsc sender; rooms hold connection ids. Membership lives only in this
//! process and does not survive reconnect — clients must rejoin.
//!
//! For multi-instance deployments the hub would be backed by an external
//! broker; a single edge node serves one store, so in-process fan-out is
//! the deployed shape.

use std::collections::HashSet;

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use shared::models::ReservationStatus;
use shared::ws::ServerEvent;

/// Per-connection outbound queue capacity; slow consumers drop events
const CHANNEL_CAPACITY: usize = 32;

pub type ConnId = Uuid;

/// A named publish/subscribe scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Room {
    /// Scoped to one reservation: the owner and staff watching it
    Reservation(i64),
    /// Staff-wide channel for operational dashboards
    Staff,
}

impl std::fmt::Display for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Room::Reservation(id) => write!(f, "reservation:{id}"),
            Room::Staff => write!(f, "staff"),
        }
    }
}

/// 通知中心 - 房间订阅与事件广播
#[derive(Debug, Default)]
pub struct NotifyHub {
    /// Connection ID -> outbound sender
    connections: DashMap<ConnId, mpsc::Sender<ServerEvent>>,
    /// Room -> member connection IDs
    rooms: DashMap<Room, HashSet<ConnId>>,
}

impl NotifyHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the outbound queue for one connection
    pub fn channel() -> (mpsc::Sender<ServerEvent>, mpsc::Receiver<ServerEvent>) {
        mpsc::channel(CHANNEL_CAPACITY)
    }

    /// Register a connection's outbound sender, returning its id
    pub fn register(&self, tx: mpsc::Sender<ServerEvent>) -> ConnId {
        let id = Uuid::new_v4();
        self.connections.insert(id, tx);
        id
    }

    /// Drop a connection and its membership in every room
    pub fn unregister(&self, conn_id: ConnId) {
        self.connections.remove(&conn_id);
        self.rooms.retain(|_, members| {
            members.remove(&conn_id);
            !members.is_empty()
        });
    }

    /// Add a registered connection to a room. Returns false for unknown
    /// connections (admission control happens at the WebSocket layer).
    pub fn join(&self, conn_id: ConnId, room: Room) -> bool {
        if !self.connections.contains_key(&conn_id) {
            return false;
        }
        self.rooms.entry(room).or_default().insert(conn_id);
        true
    }

    /// Number of members in a room
    pub fn member_count(&self, room: Room) -> usize {
        self.rooms.get(&room).map(|m| m.len()).unwrap_or(0)
    }

    /// Publish an event to every member of a room.
    ///
    /// Closed receivers are pruned; events to slow consumers are dropped
    /// rather than blocking the publisher.
    pub fn publish(&self, room: Room, event: &ServerEvent) {
        let Some(members) = self.rooms.get(&room) else {
            return;
        };
        let member_ids: Vec<ConnId> = members.iter().copied().collect();
        drop(members);

        let mut dead: Vec<ConnId> = Vec::new();
        for conn_id in member_ids {
            if let Some(tx) = self.connections.get(&conn_id) {
                match tx.try_send(event.clone()) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        tracing::warn!(%conn_id, room = %room, "Notify queue full, dropping event");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => dead.push(conn_id),
                }
            }
        }
        for conn_id in dead {
            self.unregister(conn_id);
        }
    }

    /// Push a status change to the reservation's own channel
    pub fn broadcast_status_update(&self, reservation_id: i64, status: ReservationStatus) {
        let event = ServerEvent::StatusUpdate {
            reservation_id,
            status,
        };
        self.publish(Room::Reservation(reservation_id), &event);
    }

    /// Push an event to the staff-wide channel
    pub fn broadcast_to_staff(&self, event: &ServerEvent) {
        self.publish(Room::Staff, event);
    }
}
