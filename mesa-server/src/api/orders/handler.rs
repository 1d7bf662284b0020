//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use shared::OrderStatus;

use crate::api::extract::CurrentActor;
use crate::core::ServerState;
use crate::db::models::{Order, OrderFilter, StatusHistoryEntry};
use crate::orders::{LineSelection, PlaceOrder};
use crate::utils::error::{AppError, AppResult};

/// Order placement request
#[derive(Debug, Deserialize, Validate)]
pub struct PlaceOrderRequest {
    pub table_id: String,
    #[validate(length(min = 1, message = "Order needs at least one line"), nested)]
    pub lines: Vec<OrderLineRequest>,
    pub customer_name: Option<String>,
    pub note: Option<String>,
}

/// One requested line
#[derive(Debug, Deserialize, Validate)]
pub struct OrderLineRequest {
    pub menu_item_id: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
}

/// POST /api/orders - place an order on a table
///
/// Any authenticated caller; prices and the total come from the menu,
/// never from the request.
pub async fn place(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<Order>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let input = PlaceOrder {
        table_id: payload.table_id,
        lines: payload
            .lines
            .into_iter()
            .map(|line| LineSelection {
                menu_item_id: line.menu_item_id,
                quantity: line.quantity,
            })
            .collect(),
        customer_name: payload.customer_name,
        note: payload.note,
    };

    let order = state.coordinator.place_order(input, &actor.0).await?;
    Ok(Json(order))
}

/// GET /api/orders - filtered listing, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<OrderFilter>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders.find_all(filter).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - point read
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state
        .orders
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    Ok(Json(order))
}

/// GET /api/orders/:id/history - transition ledger, most recent first
pub async fn get_history(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<StatusHistoryEntry>>> {
    state
        .orders
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    let entries = state.history.find_by_order(&id).await?;
    Ok(Json(entries))
}

/// Lifecycle transition request
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub target: OrderStatus,
    /// The status the caller believes the order is in
    pub expected: OrderStatus,
    pub note: Option<String>,
}

/// POST /api/orders/:id/transition - drive the lifecycle (staff side)
pub async fn transition(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<String>,
    Json(payload): Json<TransitionRequest>,
) -> AppResult<Json<Order>> {
    let actor = actor.require_order_manager()?;
    let order = state
        .coordinator
        .transition(
            &id,
            payload.target,
            payload.expected,
            Some(actor),
            payload.note,
        )
        .await?;
    Ok(Json(order))
}

/// POST /api/orders/:id/claim - exclusive staff claim
pub async fn claim(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let actor = actor.require_order_manager()?;
    let order = state.coordinator.claim(&id, actor).await?;
    Ok(Json(order))
}

/// Shift handover request
#[derive(Debug, Deserialize)]
pub struct ReassignRequest {
    pub from: String,
    pub to: String,
}

/// POST /api/orders/:id/reassign - hand the order to another staff member
pub async fn reassign(
    State(state): State<ServerState>,
    actor: CurrentActor,
    Path(id): Path<String>,
    Json(payload): Json<ReassignRequest>,
) -> AppResult<Json<Order>> {
    let actor = actor.require_order_manager()?;
    let order = state
        .coordinator
        .reassign(&id, &payload.from, &payload.to, actor)
        .await?;
    Ok(Json(order))
}
