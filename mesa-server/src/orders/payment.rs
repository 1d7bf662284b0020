//! Payment confirmation flow
//!
//! Inbound-only settlement: the gateway calls in, this side never
//! initiates a charge. The first confirmation is the only mutation;
//! duplicates fail with `AlreadyPaid` and write nothing.

use tracing::info;

use shared::{EventPayload, OrderStatus, StreamEvent, Topic};

use super::coordinator::{OrderCoordinator, record_key};
use super::error::{FlowError, FlowResult};
use crate::db::models::Order;

impl OrderCoordinator {
    /// Settle an order: guarded `unpaid -> paid` write, then drive the
    /// machine `pending -> confirmed` as the system actor (the paid write
    /// that just landed satisfies the payment guard).
    ///
    /// If a cancellation wins the race after the paid write lands, the
    /// confirm surfaces `Conflict`; the reference stays recorded for the
    /// gateway's refund path.
    pub async fn confirm_payment(&self, order_id: &str, payment_ref: &str) -> FlowResult<Order> {
        let updated = self
            .orders
            .confirm_payment_guarded(order_id, payment_ref)
            .await?;

        let order = match updated {
            Some(order) => order,
            None => return Err(self.classify_payment_miss(order_id).await?),
        };

        info!(order_id = %order_id, payment_ref = %payment_ref, "Payment confirmed");

        self.notifier.publish(StreamEvent::new(
            Topic::order(record_key(order.id.as_ref())),
            EventPayload::PaymentConfirmed {
                order_id: order.id_string(),
                payment_ref: payment_ref.to_string(),
                payment_status: order.payment_status,
            },
        ));

        self.transition(
            order_id,
            OrderStatus::Confirmed,
            OrderStatus::Pending,
            None,
            None,
        )
        .await
    }

    /// The guard missed: either the order is gone, already paid, or it
    /// left `pending` while still unpaid (e.g. cancelled).
    async fn classify_payment_miss(&self, order_id: &str) -> FlowResult<FlowError> {
        let current = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| FlowError::NotFound(format!("Order {} not found", order_id)))?;
        if current.payment_status.is_paid() {
            return Ok(FlowError::AlreadyPaid(format!(
                "Order {} is already paid",
                order_id
            )));
        }
        Ok(FlowError::Conflict(format!(
            "Order is {}, payment can only settle a pending order",
            current.status
        )))
    }
}
