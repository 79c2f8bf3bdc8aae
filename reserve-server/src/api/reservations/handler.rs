//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use shared::models::{
    ReservationCreate, ReservationDetail, ReservationStatus, ReservationUpdate,
    StatusHistoryEntry, TableAvailability,
};

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::utils::AppResult;

/// 列表过滤条件；缺省字段表示该维度不过滤
#[derive(Debug, Deserialize)]
pub struct ReservationFilter {
    pub status: Option<ReservationStatus>,
    /// 顾客姓名子串 (大小写不敏感)
    pub customer: Option<String>,
    pub reservation_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub start_time: i64,
    pub end_time: i64,
    pub party_size: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ReservationStatus,
    pub notes: Option<String>,
}

/// POST /api/reservations - 创建预订 (重叠则 409)
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<(StatusCode, Json<ReservationDetail>)> {
    let detail = state.scheduler.create(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/reservations - 按条件检索预订
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ReservationFilter>,
) -> AppResult<Json<Vec<ReservationDetail>>> {
    let rows = state
        .scheduler
        .filter_and_search(
            filter.status,
            filter.customer.as_deref(),
            filter.reservation_id,
        )
        .await?;
    Ok(Json(rows))
}

/// GET /api/reservations/availability - 时间窗内各桌台可用性
pub async fn availability(
    State(state): State<AppState>,
    Query(q): Query<AvailabilityQuery>,
) -> AppResult<Json<Vec<TableAvailability>>> {
    let tables = state
        .scheduler
        .availability(q.start_time, q.end_time, q.party_size)
        .await?;
    Ok(Json(tables))
}

/// GET /api/reservations/:id - 获取单个预订
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ReservationDetail>> {
    let detail = state.scheduler.detail(id).await?;
    Ok(Json(detail))
}

/// PATCH /api/reservations/:id - 改期/修改 (时间或桌台变化时重查冲突)
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReservationUpdate>,
) -> AppResult<Json<ReservationDetail>> {
    let detail = state.scheduler.update(id, payload).await?;
    Ok(Json(detail))
}

/// PATCH /api/reservations/:id/status - 状态流转 (校验状态机边)
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: CurrentUser,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<ReservationDetail>> {
    let detail = state
        .scheduler
        .update_status(&user, id, payload.status, payload.notes.as_deref())
        .await?;
    Ok(Json(detail))
}

/// PATCH /api/reservations/:id/cancel - 取消预订 (已取消则 409)
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: CurrentUser,
) -> AppResult<Json<ReservationDetail>> {
    let detail = state.scheduler.cancel(&user, id).await?;
    Ok(Json(detail))
}

/// DELETE /api/reservations/:id - 删除预订
pub async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    state.scheduler.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/reservations/:id/history - 状态历史 (时间升序)
pub async fn history(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<StatusHistoryEntry>>> {
    let entries = state.scheduler.history(id).await?;
    Ok(Json(entries))
}
