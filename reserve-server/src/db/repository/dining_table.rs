//! Dining Table Repository
//!
//! Read-only: the table catalog is maintained by administrative tooling
//! outside this service.

use super::RepoResult;
use shared::models::{DiningTable, TableAvailability};
use sqlx::SqlitePool;

const TABLE_SELECT: &str = "SELECT id, name, capacity, location, is_active FROM dining_table";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<DiningTable>> {
    let sql = format!("{TABLE_SELECT} WHERE is_active = 1 ORDER BY name");
    let tables = sqlx::query_as::<_, DiningTable>(&sql).fetch_all(pool).await?;
    Ok(tables)
}

pub async fn find_by_id(
    exec: impl sqlx::SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<DiningTable>> {
    let sql = format!("{TABLE_SELECT} WHERE id = ?");
    let table = sqlx::query_as::<_, DiningTable>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(table)
}

/// Every active table seating at least `party_size`, annotated with whether
/// it is free for the whole window `[start, end)`.
///
/// Uses the same half-open overlap predicate as
/// [`reservation::find_overlap`](super::reservation::find_overlap);
/// cancelled reservations never block.
pub async fn find_availability(
    pool: &SqlitePool,
    start: i64,
    end: i64,
    party_size: i32,
) -> RepoResult<Vec<TableAvailability>> {
    let rows = sqlx::query_as::<_, TableAvailability>(
        "SELECT t.id, t.name, t.capacity, t.location, \
         NOT EXISTS ( \
             SELECT 1 FROM reservation r \
             WHERE r.table_id = t.id \
               AND r.status != 'CANCELLED' \
               AND r.start_time < ?2 AND ?1 < r.end_time \
         ) AS available \
         FROM dining_table t \
         WHERE t.is_active = 1 AND t.capacity >= ?3 \
         ORDER BY t.capacity, t.name",
    )
    .bind(start)
    .bind(end)
    .bind(party_size)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
