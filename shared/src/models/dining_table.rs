//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Dining table entity (桌台)
///
/// The table catalog is maintained by an external administrative process;
/// reserve-server only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    pub name: String,
    /// Max party size seatable
    pub capacity: i32,
    /// Free-text placement tag, e.g. "terrace", "window"
    pub location: String,
    pub is_active: bool,
}

/// Dining table annotated with availability for a queried time window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TableAvailability {
    pub id: i64,
    pub name: String,
    pub capacity: i32,
    pub location: String,
    /// True iff no non-cancelled reservation overlaps the queried window
    pub available: bool,
}
