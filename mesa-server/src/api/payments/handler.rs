//! Payment Callback Handlers

use axum::{Json, extract::State};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::Order;
use crate::utils::error::{AppError, AppResult};

/// Gateway settlement callback
#[derive(Debug, Deserialize, Validate)]
pub struct ConfirmPaymentRequest {
    #[validate(length(min = 1, message = "order_id must not be empty"))]
    pub order_id: String,
    #[validate(length(min = 1, message = "payment_ref must not be empty"))]
    pub payment_ref: String,
}

/// POST /api/payments/confirm - settle a pending order
///
/// Idempotence contract: the first call mutates, a duplicate gets
/// `AlreadyPaid` and changes nothing.
pub async fn confirm(
    State(state): State<ServerState>,
    Json(payload): Json<ConfirmPaymentRequest>,
) -> AppResult<Json<Order>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let order = state
        .coordinator
        .confirm_payment(&payload.order_id, &payload.payment_ref)
        .await?;
    Ok(Json(order))
}
