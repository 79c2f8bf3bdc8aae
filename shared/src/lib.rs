//! Shared types for the reservation platform
//!
//! Common types used across the server and its clients: domain models,
//! WebSocket event payloads and id/time utilities.

pub mod models;
pub mod util;
pub mod ws;

// Re-exports
pub use serde::{Deserialize, Serialize};
