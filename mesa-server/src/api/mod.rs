//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`tables`] - 桌台与占用状态接口
//! - [`orders`] - 下单与生命周期接口
//! - [`payments`] - 支付网关回调
//! - [`events`] - SSE 事件订阅
//!
//! Identity arrives as gateway headers and is pulled in per-handler via
//! [`extract::CurrentActor`]; reads stay open.

pub mod extract;

pub mod events;
pub mod health;
pub mod orders;
pub mod payments;
pub mod tables;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(tables::router())
        .merge(orders::router())
        .merge(payments::router())
        .merge(events::router())
}

/// Router with state and the HTTP middleware stack
pub fn create_router(state: ServerState) -> Router {
    build_app()
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
