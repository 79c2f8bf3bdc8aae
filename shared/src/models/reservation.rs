//! Reservation Model
//!
//! A reservation holds one dining table for a half-open time interval
//! `[start_time, end_time)`. Two intervals conflict iff
//! `s1 < e2 && s2 < e1`; a reservation ending at T and another starting
//! exactly at T therefore do not conflict.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reservation lifecycle status.
///
/// The wire strings are shared with the ordering side of the platform and
/// external consumers depend on them — do not rename.
///
/// Legal transitions: `PENDING → {CONFIRMED, CANCELLED}`, then forward
/// progression along `CONFIRMED → IN_PREPARATION → READY → DELIVERED →
/// COMPLETED` (skipping stages is allowed), with `CANCELLED` reachable from
/// any non-terminal state. `COMPLETED` and `CANCELLED` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    InPreparation,
    Ready,
    Delivered,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "PENDING",
            ReservationStatus::Confirmed => "CONFIRMED",
            ReservationStatus::InPreparation => "IN_PREPARATION",
            ReservationStatus::Ready => "READY",
            ReservationStatus::Delivered => "DELIVERED",
            ReservationStatus::Completed => "COMPLETED",
            ReservationStatus::Cancelled => "CANCELLED",
        }
    }

    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Completed | ReservationStatus::Cancelled
        )
    }

    /// Position along the fulfillment chain (CANCELLED sits outside it)
    fn rank(&self) -> u8 {
        match self {
            ReservationStatus::Pending => 0,
            ReservationStatus::Confirmed => 1,
            ReservationStatus::InPreparation => 2,
            ReservationStatus::Ready => 3,
            ReservationStatus::Delivered => 4,
            ReservationStatus::Completed => 5,
            ReservationStatus::Cancelled => u8::MAX,
        }
    }

    /// Whether `self → next` is a legal lifecycle edge.
    ///
    /// Same-status is not an edge (callers treat it as a no-op upstream).
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        if *self == next {
            return false;
        }
        match (*self, next) {
            (from, Cancelled) => !from.is_terminal(),
            (Pending, Confirmed) => true,
            (Pending, _) => false,
            (from, to) => !from.is_terminal() && to != Pending && from.rank() < to.rank(),
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ReservationStatus::Pending),
            "CONFIRMED" => Ok(ReservationStatus::Confirmed),
            "IN_PREPARATION" => Ok(ReservationStatus::InPreparation),
            "READY" => Ok(ReservationStatus::Ready),
            "DELIVERED" => Ok(ReservationStatus::Delivered),
            "COMPLETED" => Ok(ReservationStatus::Completed),
            "CANCELLED" => Ok(ReservationStatus::Cancelled),
            other => Err(format!("Unknown reservation status: {other}")),
        }
    }
}

/// Half-open interval intersection test: `[s1,e1)` and `[s2,e2)` overlap
/// iff `s1 < e2 && s2 < e1`. Touching intervals (`e1 == s2`) do not.
pub fn intervals_overlap(s1: i64, e1: i64, s2: i64, e2: i64) -> bool {
    s1 < e2 && s2 < e1
}

/// Reservation entity (预订)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: i64,
    pub user_id: i64,
    pub table_id: i64,
    /// Inclusive start, unix ms
    pub start_time: i64,
    /// Exclusive end, unix ms
    pub end_time: i64,
    pub party_size: i32,
    pub status: ReservationStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub user_id: i64,
    pub table_id: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub party_size: i32,
}

/// Update reservation payload (reschedule / edit party size or table)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationUpdate {
    pub table_id: Option<i64>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub party_size: Option<i32>,
}

/// Reservation with owner and table hydrated (for list/detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ReservationDetail {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub table_id: i64,
    pub table_name: String,
    pub table_capacity: i32,
    pub table_location: String,
    pub start_time: i64,
    pub end_time: i64,
    pub party_size: i32,
    pub status: ReservationStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One entry of a reservation's status audit trail, actor hydrated
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StatusHistoryEntry {
    pub id: i64,
    pub reservation_id: i64,
    /// The status transitioned *to*
    pub status: ReservationStatus,
    pub changed_by_id: i64,
    pub changed_by_name: String,
    pub notes: Option<String>,
    pub changed_at: i64,
}
