//! API 路由模块
//!
//! # 结构
//!
//! - [`reservations`] - 预订管理接口 (创建/查询/改期/状态流转/取消/删除/历史)
//! - [`tables`] - 桌台目录接口 (只读)
//! - [`ws`] - WebSocket 实时通道 (joinReservation / joinStaff)

pub mod reservations;
pub mod tables;
pub mod ws;

use axum::{Router, middleware, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::AppState;

/// 组装完整路由：业务路由 + 认证中间件 + CORS/Trace
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(reservations::router())
        .merge(tables::router())
        .route("/api/ws", get(ws::handle_ws))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
