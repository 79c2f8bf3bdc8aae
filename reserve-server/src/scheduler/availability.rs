//! 可用性查询引擎
//!
//! Read-only sibling of the booking path: for a window and party size,
//! report every qualifying table with an `available` flag. Unavailable
//! tables are included so callers can render them as disabled.
//!
//! Shares the overlap predicate with the scheduler's conflict check, so the
//! two query paths cannot disagree about what "free" means.

use sqlx::SqlitePool;

use shared::models::TableAvailability;

use crate::db::repository::dining_table;
use crate::utils::{AppError, AppResult};

/// Every active table with `capacity >= party_size`, annotated with whether
/// it is free throughout `[start, end)`.
pub async fn get_availability(
    pool: &SqlitePool,
    start: i64,
    end: i64,
    party_size: i32,
) -> AppResult<Vec<TableAvailability>> {
    if start >= end {
        return Err(AppError::validation("start_time must be before end_time"));
    }
    if party_size < 1 {
        return Err(AppError::validation("party_size must be positive"));
    }

    Ok(dining_table::find_availability(pool, start, end, party_size).await?)
}
