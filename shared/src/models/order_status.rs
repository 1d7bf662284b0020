//! Order lifecycle status
//!
//! One unified machine covers the kitchen and customer views. The adjacency
//! below is the single source of truth; the server validates every
//! transition against it and clients use it to render the allowed next
//! steps.
//!
//! ```text
//! pending -> confirmed -> preparing -> ready -> on_the_way -> completed
//!                                        \-> delivered
//! any non-terminal -> cancelled
//! ```
//!
//! `delivered`, `completed` and `cancelled` are terminal and absorbing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, awaiting payment confirmation
    #[default]
    Pending,
    /// Payment confirmed, queued for the kitchen
    Confirmed,
    /// Kitchen is working on it
    Preparing,
    /// Plated, waiting for hand-off
    Ready,
    /// Courier left with the order (delivery flow)
    OnTheWay,
    /// Handed to the diner at the table (dine-in flow)
    Delivered,
    /// Delivery flow finished
    Completed,
    /// Abandoned before completion
    Cancelled,
}

impl OrderStatus {
    /// Terminal statuses absorb: nothing may follow them.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Completed | Self::Cancelled)
    }

    /// Statuses reachable in one step from `self`.
    pub fn next_statuses(self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Pending => &[Confirmed, Cancelled],
            Confirmed => &[Preparing, Cancelled],
            Preparing => &[Ready, Cancelled],
            Ready => &[OnTheWay, Delivered, Cancelled],
            OnTheWay => &[Completed, Cancelled],
            Delivered | Completed | Cancelled => &[],
        }
    }

    /// Whether `target` is adjacent to `self` in the lifecycle graph.
    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        self.next_statuses().contains(&target)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::OnTheWay => "on_the_way",
            Self::Delivered => "delivered",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status
///
/// Settlement is inbound-only: the gateway confirms, the coordinator never
/// initiates. `refunded` exists for the gateway's out-of-band flows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn is_paid(self) -> bool {
        matches!(self, Self::Paid)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrderStatus; 8] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::OnTheWay,
        OrderStatus::Delivered,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    #[test]
    fn test_happy_path_adjacency() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Ready));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::OnTheWay));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::OnTheWay.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn test_no_status_jumps() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Preparing));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Ready));
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Ready));
        assert!(!OrderStatus::Preparing.can_transition_to(OrderStatus::OnTheWay));
        assert!(!OrderStatus::Preparing.can_transition_to(OrderStatus::Delivered));
        // No going backwards either
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Preparing));
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_every_non_terminal_can_cancel() {
        for status in ALL {
            if !status.is_terminal() {
                assert!(
                    status.can_transition_to(OrderStatus::Cancelled),
                    "{status} should allow cancellation"
                );
            }
        }
    }

    #[test]
    fn test_terminal_statuses_absorb() {
        for terminal in [
            OrderStatus::Delivered,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert!(terminal.is_terminal());
            assert!(terminal.next_statuses().is_empty());
            for target in ALL {
                assert!(!terminal.can_transition_to(target));
            }
        }
    }

    #[test]
    fn test_self_transition_rejected() {
        for status in ALL {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn test_wire_values_are_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::OnTheWay).unwrap(),
            "\"on_the_way\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"pending\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"preparing\"").unwrap();
        assert_eq!(parsed, OrderStatus::Preparing);
    }

    #[test]
    fn test_unknown_wire_value_rejected() {
        // Closed enum: anything outside the eight known values dies at serde
        assert!(serde_json::from_str::<OrderStatus>("\"being_cooked\"").is_err());
        assert!(serde_json::from_str::<OrderStatus>("\"PENDING\"").is_err());
    }

    #[test]
    fn test_display_matches_wire_value() {
        for status in ALL {
            let wire = serde_json::to_string(&status).unwrap();
            assert_eq!(wire, format!("\"{status}\""));
        }
    }

    #[test]
    fn test_payment_status() {
        assert!(PaymentStatus::Paid.is_paid());
        assert!(!PaymentStatus::Unpaid.is_paid());
        assert!(!PaymentStatus::Refunded.is_paid());
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Unpaid).unwrap(),
            "\"unpaid\""
        );
    }
}
