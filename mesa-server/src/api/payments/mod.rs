//! Payment Callback API Module
//!
//! Inbound settlement only. The gateway calls this server-to-server, so
//! there is no actor identity on the request; the resulting transition is
//! recorded with a system actor.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/payments/confirm", post(handler::confirm))
}
