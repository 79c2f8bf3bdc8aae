//! Reservation API 模块

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/reservations", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/availability", get(handler::availability))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .patch(handler::update)
                .delete(handler::remove),
        )
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/cancel", patch(handler::cancel))
        .route("/{id}/history", get(handler::history))
}
