//! 预订调度器
//!
//! The booking core: decides whether a reservation is legal (no overlap on
//! the target table), creates/updates/cancels reservations and drives the
//! status lifecycle. Every check-and-write pair runs inside one
//! `BEGIN IMMEDIATE` transaction — SQLite admits a single writer, so two
//! racing bookings for the same window cannot both pass the overlap check.

pub mod availability;


use std::sync::Arc;

use sqlx::SqlitePool;

use shared::models::{
    ReservationCreate, ReservationDetail, ReservationStatus, ReservationUpdate,
    StatusHistoryEntry, TableAvailability,
};
use shared::ws::ServerEvent;

use crate::auth::CurrentUser;
use crate::db::repository::{dining_table, reservation, user};
use crate::notify::NotifyHub;
use crate::utils::{AppError, AppResult};

/// 预订调度器 - 持有连接池与通知中心
#[derive(Clone)]
pub struct ReservationScheduler {
    pool: SqlitePool,
    notify: Arc<NotifyHub>,
}

impl ReservationScheduler {
    pub fn new(pool: SqlitePool, notify: Arc<NotifyHub>) -> Self {
        Self { pool, notify }
    }

    /// Book a table for `[start_time, end_time)`.
    ///
    /// The new reservation starts as PENDING and gets its initial history
    /// entry attributed to `actor`. Overlap with any non-cancelled
    /// reservation on the same table rejects the request with a conflict;
    /// nothing is persisted. No broadcast on plain creation.
    pub async fn create(
        &self,
        actor: &CurrentUser,
        data: ReservationCreate,
    ) -> AppResult<ReservationDetail> {
        validate_window(data.start_time, data.end_time, data.party_size)?;

        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let table = dining_table::find_by_id(&mut *tx, data.table_id)
            .await?
            .filter(|t| t.is_active)
            .ok_or_else(|| AppError::not_found(format!("Table {} not found", data.table_id)))?;
        if data.party_size > table.capacity {
            return Err(AppError::validation(format!(
                "Party size {} exceeds capacity {} of table {}",
                data.party_size, table.capacity, table.name
            )));
        }
        user::find_by_id(&mut *tx, data.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {} not found", data.user_id)))?;

        if reservation::find_overlap(
            &mut *tx,
            data.table_id,
            data.start_time,
            data.end_time,
            None,
        )
        .await?
        {
            return Err(AppError::conflict(
                "Table not available in the selected time window",
            ));
        }

        let id = reservation::insert(&mut *tx, &data).await?;
        reservation::append_history(&mut *tx, id, ReservationStatus::Pending, actor.id, None)
            .await?;
        tx.commit().await?;

        tracing::info!(
            reservation_id = id,
            table_id = data.table_id,
            user_id = data.user_id,
            "Reservation created"
        );

        self.detail(id).await
    }

    /// Transition a reservation to `new_status`.
    ///
    /// Same-status is a no-op: no history entry, no broadcast. Illegal
    /// lifecycle edges are rejected. An accepted transition persists the
    /// status, appends one history entry and fans the change out to the
    /// reservation's channel and the staff channel.
    pub async fn update_status(
        &self,
        actor: &CurrentUser,
        id: i64,
        new_status: ReservationStatus,
        notes: Option<&str>,
    ) -> AppResult<ReservationDetail> {
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        let current = reservation::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Reservation {id} not found")))?;

        if current.status == new_status {
            drop(tx);
            return self.detail(id).await;
        }

        if !current.status.can_transition_to(new_status) {
            return Err(AppError::validation(format!(
                "Illegal status transition: {} -> {}",
                current.status, new_status
            )));
        }

        reservation::set_status(&mut *tx, id, new_status).await?;
        reservation::append_history(&mut *tx, id, new_status, actor.id, notes).await?;
        tx.commit().await?;

        tracing::info!(
            reservation_id = id,
            status = %new_status,
            changed_by = actor.id,
            "Reservation status updated"
        );

        self.notify.broadcast_status_update(id, new_status);
        self.notify.broadcast_to_staff(&ServerEvent::StatusUpdate {
            reservation_id: id,
            status: new_status,
        });

        self.detail(id).await
    }

    /// Reschedule / edit a reservation (table, window, party size).
    ///
    /// When the table or window changes, the merged interval is re-checked
    /// for overlap excluding the reservation itself. Plain field edit: no
    /// history entry, no broadcast.
    pub async fn update(&self, id: i64, data: ReservationUpdate) -> AppResult<ReservationDetail> {
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        let current = reservation::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Reservation {id} not found")))?;

        let table_id = data.table_id.unwrap_or(current.table_id);
        let start_time = data.start_time.unwrap_or(current.start_time);
        let end_time = data.end_time.unwrap_or(current.end_time);
        let party_size = data.party_size.unwrap_or(current.party_size);

        validate_window(start_time, end_time, party_size)?;

        let table = dining_table::find_by_id(&mut *tx, table_id)
            .await?
            .filter(|t| t.is_active)
            .ok_or_else(|| AppError::not_found(format!("Table {table_id} not found")))?;
        if party_size > table.capacity {
            return Err(AppError::validation(format!(
                "Party size {} exceeds capacity {} of table {}",
                party_size, table.capacity, table.name
            )));
        }

        let window_changed = table_id != current.table_id
            || start_time != current.start_time
            || end_time != current.end_time;
        if window_changed
            && reservation::find_overlap(&mut *tx, table_id, start_time, end_time, Some(id))
                .await?
        {
            return Err(AppError::conflict(
                "Table not available in the selected time window",
            ));
        }

        reservation::update_fields(&mut *tx, id, table_id, start_time, end_time, party_size)
            .await?;
        tx.commit().await?;

        tracing::info!(reservation_id = id, "Reservation updated");

        self.detail(id).await
    }

    /// Cancel a reservation.
    ///
    /// Legal from every non-terminal state; cancelling twice is a conflict.
    pub async fn cancel(&self, actor: &CurrentUser, id: i64) -> AppResult<ReservationDetail> {
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        let current = reservation::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Reservation {id} not found")))?;

        if current.status == ReservationStatus::Cancelled {
            return Err(AppError::conflict("Reservation already cancelled"));
        }
        if !current.status.can_transition_to(ReservationStatus::Cancelled) {
            return Err(AppError::validation(format!(
                "{} reservation cannot be cancelled",
                current.status
            )));
        }

        reservation::set_status(&mut *tx, id, ReservationStatus::Cancelled).await?;
        reservation::append_history(&mut *tx, id, ReservationStatus::Cancelled, actor.id, None)
            .await?;
        tx.commit().await?;

        tracing::info!(reservation_id = id, changed_by = actor.id, "Reservation cancelled");

        self.notify
            .broadcast_status_update(id, ReservationStatus::Cancelled);
        self.notify.broadcast_to_staff(&ServerEvent::StatusUpdate {
            reservation_id: id,
            status: ReservationStatus::Cancelled,
        });

        self.detail(id).await
    }

    /// Permanently delete a reservation (administrative escape hatch; no
    /// status guard). History rows are removed by FK cascade.
    pub async fn remove(&self, id: i64) -> AppResult<()> {
        if !reservation::delete(&self.pool, id).await? {
            return Err(AppError::not_found(format!("Reservation {id} not found")));
        }
        tracing::info!(reservation_id = id, "Reservation removed");
        Ok(())
    }

    /// Reservations matching all provided filters, hydrated
    pub async fn filter_and_search(
        &self,
        status: Option<ReservationStatus>,
        customer: Option<&str>,
        reservation_id: Option<i64>,
    ) -> AppResult<Vec<ReservationDetail>> {
        Ok(reservation::filter_and_search(&self.pool, status, customer, reservation_id).await?)
    }

    /// One reservation, owner and table hydrated
    pub async fn detail(&self, id: i64) -> AppResult<ReservationDetail> {
        reservation::find_detail_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Reservation {id} not found")))
    }

    /// Full status trail, oldest first
    pub async fn history(&self, id: i64) -> AppResult<Vec<StatusHistoryEntry>> {
        reservation::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Reservation {id} not found")))?;
        Ok(reservation::find_history(&self.pool, id).await?)
    }

    /// Tables seating `party_size`, annotated with availability for the window
    pub async fn availability(
        &self,
        start: i64,
        end: i64,
        party_size: i32,
    ) -> AppResult<Vec<TableAvailability>> {
        availability::get_availability(&self.pool, start, end, party_size).await
    }
}

fn validate_window(start_time: i64, end_time: i64, party_size: i32) -> AppResult<()> {
    if start_time >= end_time {
        return Err(AppError::validation("start_time must be before end_time"));
    }
    if party_size < 1 {
        return Err(AppError::validation("party_size must be positive"));
    }
    Ok(())
}
