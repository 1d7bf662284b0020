//! Realtime fan-out events
//!
//! Every committed mutation publishes a [`StreamEvent`] to its topic(s).
//! Delivery is at-least-once: subscribers must apply idempotently (key on
//! status + timestamp) and re-read current state after a resubscribe.

pub mod topic;

pub use topic::{Topic, TopicParseError};

use crate::models::{OrderStatus, PaymentStatus, TableStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happened, as carried on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EventPayload {
    /// A new order claimed its table
    OrderPlaced {
        order_id: String,
        table_id: String,
        table_number: u32,
        total_amount: f64,
        status: OrderStatus,
    },
    /// The lifecycle machine accepted a transition
    OrderStatusChanged {
        order_id: String,
        status: OrderStatus,
        previous: OrderStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        actor_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    /// Staff claim or handover
    OrderAssigned {
        order_id: String,
        staff_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        previous_staff_id: Option<String>,
    },
    /// Gateway settled the bill
    PaymentConfirmed {
        order_id: String,
        payment_ref: String,
        payment_status: PaymentStatus,
    },
    /// Occupancy change, automatic or manual
    TableStatusChanged {
        table_id: String,
        table_number: u32,
        status: TableStatus,
        previous: TableStatus,
    },
}

impl EventPayload {
    /// Wire tag of this variant, e.g. for SSE event names
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OrderPlaced { .. } => "order_placed",
            Self::OrderStatusChanged { .. } => "order_status_changed",
            Self::OrderAssigned { .. } => "order_assigned",
            Self::PaymentConfirmed { .. } => "payment_confirmed",
            Self::TableStatusChanged { .. } => "table_status_changed",
        }
    }
}

/// One event on one topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEvent {
    /// Unique per publication, for log correlation
    pub event_id: String,
    pub topic: Topic,
    /// Publication time, Unix millis
    pub timestamp: i64,
    pub payload: EventPayload,
}

impl StreamEvent {
    pub fn new(topic: Topic, payload: EventPayload) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            topic,
            timestamp: chrono::Utc::now().timestamp_millis(),
            payload,
        }
    }

    /// Same payload re-addressed to another topic (fan-out keeps one
    /// timestamp across copies so subscribers can dedupe).
    pub fn retopic(&self, topic: Topic) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            topic,
            timestamp: self.timestamp,
            payload: self.payload.clone(),
        }
    }

    /// Order id carried by the payload, if this is an order event.
    pub fn order_id(&self) -> Option<&str> {
        match &self.payload {
            EventPayload::OrderPlaced { order_id, .. }
            | EventPayload::OrderStatusChanged { order_id, .. }
            | EventPayload::OrderAssigned { order_id, .. }
            | EventPayload::PaymentConfirmed { order_id, .. } => Some(order_id),
            EventPayload::TableStatusChanged { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_changed() -> EventPayload {
        EventPayload::OrderStatusChanged {
            order_id: "order:abc".to_string(),
            status: OrderStatus::Preparing,
            previous: OrderStatus::Confirmed,
            actor_id: Some("staff-1".to_string()),
            note: None,
        }
    }

    #[test]
    fn test_event_construction() {
        let event = StreamEvent::new(Topic::order("abc"), status_changed());
        assert_eq!(event.topic, Topic::order("abc"));
        assert!(event.timestamp > 0);
        assert_eq!(event.order_id(), Some("order:abc"));
    }

    #[test]
    fn test_retopic_keeps_timestamp_and_payload() {
        let event = StreamEvent::new(Topic::order("abc"), status_changed());
        let copy = event.retopic(Topic::KitchenAll);
        assert_eq!(copy.topic, Topic::KitchenAll);
        assert_eq!(copy.timestamp, event.timestamp);
        assert_eq!(copy.payload, event.payload);
        assert_ne!(copy.event_id, event.event_id);
    }

    #[test]
    fn test_payload_wire_format() {
        let event = StreamEvent::new(Topic::order("abc"), status_changed());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["topic"], "order:abc");
        assert_eq!(json["payload"]["type"], "order_status_changed");
        // kind() must agree with the serde tag
        assert_eq!(event.payload.kind(), "order_status_changed");
        assert_eq!(json["payload"]["data"]["status"], "preparing");
        assert_eq!(json["payload"]["data"]["previous"], "confirmed");

        let back: StreamEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_table_event_has_no_order_id() {
        let event = StreamEvent::new(
            Topic::table("t5"),
            EventPayload::TableStatusChanged {
                table_id: "dining_table:t5".to_string(),
                table_number: 5,
                status: TableStatus::Available,
                previous: TableStatus::Occupied,
            },
        );
        assert_eq!(event.order_id(), None);
    }
}
