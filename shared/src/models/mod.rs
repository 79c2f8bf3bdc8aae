//! Data models
//!
//! Shared between reserve-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY); all timestamps are
//! i64 unix milliseconds.

pub mod dining_table;
pub mod reservation;
pub mod user;

// Re-exports
pub use dining_table::*;
pub use reservation::*;
pub use user::*;
