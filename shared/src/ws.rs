//! WebSocket event payloads (client ⇄ server)
//!
//! JSON messages tagged by `type`. Event names are part of the public
//! real-time protocol and match what the web frontends emit/listen for.

use crate::models::ReservationStatus;
use serde::{Deserialize, Serialize};

/// Events a connected client may emit.
///
/// Channel membership is per server instance and does not survive a
/// reconnect; clients must rejoin after connecting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Subscribe to one reservation's status updates. Admitted only for the
    /// reservation's owner or staff/admin roles; re-validated per join.
    JoinReservation { reservation_id: i64 },
    /// Subscribe to the staff-wide channel (operational dashboards).
    JoinStaff,
}

/// Events the server pushes to channel members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A reservation's status changed
    StatusUpdate {
        reservation_id: i64,
        status: ReservationStatus,
    },
    /// Join accepted
    Joined { room: String },
    /// Join refused or message not understood; no membership granted
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_event_wire_format() {
        let ev: ClientEvent =
            serde_json::from_str(r#"{"type":"joinReservation","reservation_id":42}"#).unwrap();
        assert_eq!(ev, ClientEvent::JoinReservation { reservation_id: 42 });

        let ev: ClientEvent = serde_json::from_str(r#"{"type":"joinStaff"}"#).unwrap();
        assert_eq!(ev, ClientEvent::JoinStaff);
    }

    #[test]
    fn server_event_wire_format() {
        let json = serde_json::to_string(&ServerEvent::StatusUpdate {
            reservation_id: 7,
            status: ReservationStatus::Confirmed,
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"type":"statusUpdate","reservation_id":7,"status":"CONFIRMED"}"#
        );
    }
}
