//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::models::DiningTable;

use crate::core::AppState;
use crate::db::repository::dining_table;
use crate::utils::{AppError, AppResult};

/// GET /api/tables - 获取所有桌台
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = dining_table::find_all(&state.db.pool).await?;
    Ok(Json(tables))
}

/// GET /api/tables/:id - 获取单个桌台
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DiningTable>> {
    let table = dining_table::find_by_id(&state.db.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {id} not found")))?;
    Ok(Json(table))
}
