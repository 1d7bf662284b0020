//! Staff assignment flow
//!
//! Exclusive claim of orders. The store guard arbitrates; there is no
//! in-process lock, so N racing claims resolve to one winner and N-1
//! `AlreadyAssigned` losers.

use tracing::info;

use shared::{Actor, EventPayload, StreamEvent, Topic};

use super::coordinator::{OrderCoordinator, record_key};
use super::error::{FlowError, FlowResult};
use crate::db::models::Order;

impl OrderCoordinator {
    /// First claimer wins. A repeat claim by the current assignee is an
    /// idempotent success and writes nothing.
    pub async fn claim(&self, order_id: &str, staff: &Actor) -> FlowResult<Order> {
        let updated = self.orders.assign_staff_guarded(order_id, &staff.id).await?;
        if let Some(order) = updated {
            info!(order_id = %order_id, staff = %staff.id, "Order claimed");
            self.notifier.publish(StreamEvent::new(
                Topic::order(record_key(order.id.as_ref())),
                EventPayload::OrderAssigned {
                    order_id: order.id_string(),
                    staff_id: staff.id.clone(),
                    previous_staff_id: None,
                },
            ));
            return Ok(order);
        }

        let current = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| FlowError::NotFound(format!("Order {} not found", order_id)))?;
        match current.staff_id.as_deref() {
            Some(holder) if holder == staff.id => Ok(current),
            Some(holder) => Err(FlowError::AlreadyAssigned(format!(
                "Order is assigned to {}",
                holder
            ))),
            None => Err(FlowError::Conflict(
                "Order assignment changed, re-read".to_string(),
            )),
        }
    }

    /// Shift handover: move the assignment `from -> to`, guarded on the
    /// current assignee still being `from`.
    pub async fn reassign(
        &self,
        order_id: &str,
        from: &str,
        to: &str,
        actor: &Actor,
    ) -> FlowResult<Order> {
        let updated = self
            .orders
            .reassign_staff_guarded(order_id, from, to)
            .await?;
        if let Some(order) = updated {
            info!(
                order_id = %order_id,
                from = %from,
                to = %to,
                actor = %actor.id,
                "Order reassigned"
            );
            self.notifier.publish(StreamEvent::new(
                Topic::order(record_key(order.id.as_ref())),
                EventPayload::OrderAssigned {
                    order_id: order.id_string(),
                    staff_id: to.to_string(),
                    previous_staff_id: Some(from.to_string()),
                },
            ));
            return Ok(order);
        }

        let current = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| FlowError::NotFound(format!("Order {} not found", order_id)))?;
        let holder = current.staff_id.as_deref().unwrap_or("nobody");
        Err(FlowError::AlreadyAssigned(format!(
            "Order is assigned to {}, not {}",
            holder, from
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::coordinator::tests::{diner, setup, standard_order};
    use shared::Role;

    fn staff(id: &str) -> Actor {
        Actor::new(id, Role::Staff)
    }

    #[tokio::test]
    async fn test_claim_assigns_staff() {
        let bed = setup().await;
        let order = bed
            .coordinator
            .place_order(standard_order(&bed), &diner())
            .await
            .unwrap();

        let claimed = bed
            .coordinator
            .claim(&order.id_string(), &staff("staff-1"))
            .await
            .unwrap();
        assert_eq!(claimed.staff_id.as_deref(), Some("staff-1"));
    }

    #[tokio::test]
    async fn test_second_claim_names_the_holder() {
        let bed = setup().await;
        let order = bed
            .coordinator
            .place_order(standard_order(&bed), &diner())
            .await
            .unwrap();
        let id = order.id_string();

        bed.coordinator.claim(&id, &staff("staff-1")).await.unwrap();
        let err = bed
            .coordinator
            .claim(&id, &staff("staff-2"))
            .await
            .unwrap_err();
        match err {
            FlowError::AlreadyAssigned(msg) => assert!(msg.contains("staff-1")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_repeat_claim_is_idempotent() {
        let bed = setup().await;
        let order = bed
            .coordinator
            .place_order(standard_order(&bed), &diner())
            .await
            .unwrap();
        let id = order.id_string();
        let key = order.id.as_ref().unwrap().key().to_string();
        let mut rx = bed.notifier.subscribe(&Topic::order(key));

        bed.coordinator.claim(&id, &staff("staff-1")).await.unwrap();
        let again = bed.coordinator.claim(&id, &staff("staff-1")).await.unwrap();
        assert_eq!(again.staff_id.as_deref(), Some("staff-1"));

        // only the first claim published an event
        assert!(matches!(
            rx.try_recv().unwrap().payload,
            EventPayload::OrderAssigned { .. }
        ));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_reassign_hands_over() {
        let bed = setup().await;
        let order = bed
            .coordinator
            .place_order(standard_order(&bed), &diner())
            .await
            .unwrap();
        let id = order.id_string();

        bed.coordinator.claim(&id, &staff("staff-1")).await.unwrap();
        let updated = bed
            .coordinator
            .reassign(&id, "staff-1", "staff-2", &staff("staff-1"))
            .await
            .unwrap();
        assert_eq!(updated.staff_id.as_deref(), Some("staff-2"));
    }

    #[tokio::test]
    async fn test_reassign_with_stale_view_is_rejected() {
        let bed = setup().await;
        let order = bed
            .coordinator
            .place_order(standard_order(&bed), &diner())
            .await
            .unwrap();
        let id = order.id_string();

        bed.coordinator.claim(&id, &staff("staff-1")).await.unwrap();
        let err = bed
            .coordinator
            .reassign(&id, "staff-9", "staff-2", &staff("staff-9"))
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::AlreadyAssigned(_)));

        // holder unchanged
        let current = bed.coordinator.orders.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(current.staff_id.as_deref(), Some("staff-1"));
    }

    #[tokio::test]
    async fn test_claim_missing_order() {
        let bed = setup().await;
        let err = bed
            .coordinator
            .claim("order:missing", &staff("staff-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::NotFound(_)));
    }
}
