//! Order API Module
//!
//! Placement, listing and the lifecycle verbs. All mutations go through
//! the coordinator; handlers never touch the store directly.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::place).get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/history", get(handler::get_history))
        .route("/{id}/transition", post(handler::transition))
        .route("/{id}/claim", post(handler::claim))
        .route("/{id}/reassign", post(handler::reassign))
}
