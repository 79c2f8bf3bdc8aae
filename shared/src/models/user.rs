//! User Model
//!
//! Read-only mirror of the external user directory. Reserve-server never
//! creates or mutates users; it only resolves ids for display, ownership
//! checks and search-by-customer-name.

use serde::{Deserialize, Serialize};

/// User entity (顾客/员工)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub name: String,
    /// "ADMIN" | "STAFF" | "CUSTOMER"
    pub role: String,
}
