//! Reservation Repository
//!
//! Owns reservation persistence, the overlap-detection query used by both
//! booking and availability checks, and the append-only status history.
//!
//! Functions take `impl SqliteExecutor` so the scheduler can run the
//! check-and-write pair of a booking inside one transaction.

use super::RepoResult;
use shared::models::{
    Reservation, ReservationCreate, ReservationDetail, ReservationStatus, StatusHistoryEntry,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const DETAIL_SELECT: &str = "SELECT r.id, r.user_id, u.name AS user_name, \
     r.table_id, t.name AS table_name, t.capacity AS table_capacity, \
     t.location AS table_location, r.start_time, r.end_time, r.party_size, \
     r.status, r.created_at, r.updated_at \
     FROM reservation r \
     JOIN user u ON r.user_id = u.id \
     JOIN dining_table t ON r.table_id = t.id";

/// Does any reservation on `table_id` overlap the half-open window
/// `[start, end)`?
///
/// Overlap: `start_time < end && start < end_time` — touching intervals do
/// not conflict. CANCELLED reservations never block. `exclude` skips one
/// reservation id, so a reschedule does not conflict with itself.
pub async fn find_overlap(
    exec: impl sqlx::SqliteExecutor<'_>,
    table_id: i64,
    start: i64,
    end: i64,
    exclude: Option<i64>,
) -> RepoResult<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM reservation \
         WHERE table_id = ?1 \
           AND status != 'CANCELLED' \
           AND start_time < ?3 AND ?2 < end_time \
           AND (?4 IS NULL OR id != ?4)",
    )
    .bind(table_id)
    .bind(start)
    .bind(end)
    .bind(exclude)
    .fetch_one(exec)
    .await?;
    Ok(count > 0)
}

/// Insert a new PENDING reservation, returning its id
pub async fn insert(
    exec: impl sqlx::SqliteExecutor<'_>,
    data: &ReservationCreate,
) -> RepoResult<i64> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO reservation \
         (id, user_id, table_id, start_time, end_time, party_size, status, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'PENDING', ?7, ?7)",
    )
    .bind(id)
    .bind(data.user_id)
    .bind(data.table_id)
    .bind(data.start_time)
    .bind(data.end_time)
    .bind(data.party_size)
    .bind(now)
    .execute(exec)
    .await?;
    Ok(id)
}

pub async fn find_by_id(
    exec: impl sqlx::SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<Reservation>> {
    let row = sqlx::query_as::<_, Reservation>(
        "SELECT id, user_id, table_id, start_time, end_time, party_size, status, \
         created_at, updated_at FROM reservation WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(exec)
    .await?;
    Ok(row)
}

pub async fn find_detail_by_id(
    pool: &SqlitePool,
    id: i64,
) -> RepoResult<Option<ReservationDetail>> {
    let sql = format!("{DETAIL_SELECT} WHERE r.id = ?");
    let row = sqlx::query_as::<_, ReservationDetail>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Overwrite the mutable booking fields (reschedule / edit)
pub async fn update_fields(
    exec: impl sqlx::SqliteExecutor<'_>,
    id: i64,
    table_id: i64,
    start_time: i64,
    end_time: i64,
    party_size: i32,
) -> RepoResult<()> {
    sqlx::query(
        "UPDATE reservation SET table_id = ?1, start_time = ?2, end_time = ?3, \
         party_size = ?4, updated_at = ?5 WHERE id = ?6",
    )
    .bind(table_id)
    .bind(start_time)
    .bind(end_time)
    .bind(party_size)
    .bind(now_millis())
    .bind(id)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn set_status(
    exec: impl sqlx::SqliteExecutor<'_>,
    id: i64,
    status: ReservationStatus,
) -> RepoResult<()> {
    sqlx::query("UPDATE reservation SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now_millis())
        .bind(id)
        .execute(exec)
        .await?;
    Ok(())
}

/// Hard delete; history rows go with it (ON DELETE CASCADE)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM reservation WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Reservations matching all provided filters, owner and table hydrated.
///
/// - `status`: exact match
/// - `customer`: case-insensitive substring match on the owner's name
/// - `reservation_id`: exact match
///
/// An absent filter matches everything for that dimension.
pub async fn filter_and_search(
    pool: &SqlitePool,
    status: Option<ReservationStatus>,
    customer: Option<&str>,
    reservation_id: Option<i64>,
) -> RepoResult<Vec<ReservationDetail>> {
    let sql = format!(
        "{DETAIL_SELECT} \
         WHERE (?1 IS NULL OR r.status = ?1) \
           AND (?2 IS NULL OR u.name LIKE ?2) \
           AND (?3 IS NULL OR r.id = ?3) \
         ORDER BY r.start_time"
    );
    let rows = sqlx::query_as::<_, ReservationDetail>(&sql)
        .bind(status)
        .bind(customer.map(|c| format!("%{c}%")))
        .bind(reservation_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Append one status-history entry (pure insert, one per accepted transition).
///
/// The row id is assigned by SQLite, so ids follow insertion order and break
/// same-millisecond ties in `find_history`.
pub async fn append_history(
    exec: impl sqlx::SqliteExecutor<'_>,
    reservation_id: i64,
    status: ReservationStatus,
    changed_by_id: i64,
    notes: Option<&str>,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO reservation_status_history \
         (reservation_id, status, changed_by_id, notes, changed_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(reservation_id)
    .bind(status)
    .bind(changed_by_id)
    .bind(notes)
    .bind(now_millis())
    .execute(exec)
    .await?;
    Ok(())
}

/// Full status trail for a reservation, oldest first, actor hydrated
pub async fn find_history(
    pool: &SqlitePool,
    reservation_id: i64,
) -> RepoResult<Vec<StatusHistoryEntry>> {
    let rows = sqlx::query_as::<_, StatusHistoryEntry>(
        "SELECT h.id, h.reservation_id, h.status, h.changed_by_id, \
         u.name AS changed_by_name, h.notes, h.changed_at \
         FROM reservation_status_history h \
         JOIN user u ON h.changed_by_id = u.id \
         WHERE h.reservation_id = ? \
         ORDER BY h.changed_at ASC, h.id ASC",
    )
    .bind(reservation_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
