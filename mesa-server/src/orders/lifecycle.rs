//! Order lifecycle rules
//!
//! Single authority on which status moves are even handed to the store.
//! Adjacency lives on [`OrderStatus::next_statuses`]; this module layers
//! the cross-field payment guard on top and turns violations into typed
//! errors. One machine serves kitchen and customer views.

use super::error::FlowError;
use shared::{OrderStatus, PaymentStatus};

/// Validate `current -> target` before any write is attempted.
///
/// `current` is the caller's expectation, not a fresh read; a stale
/// expectation that passes here still loses at the store guard.
pub fn validate_transition(
    current: OrderStatus,
    target: OrderStatus,
    payment_status: PaymentStatus,
) -> Result<(), FlowError> {
    if current.is_terminal() {
        return Err(FlowError::InvalidTransition(format!(
            "Order is {} and can no longer change",
            current
        )));
    }
    if !current.can_transition_to(target) {
        return Err(FlowError::InvalidTransition(format!(
            "Cannot move from {} to {}",
            current, target
        )));
    }
    // pending -> confirmed 只对已支付订单开放
    if current == OrderStatus::Pending
        && target == OrderStatus::Confirmed
        && !payment_status.is_paid()
    {
        return Err(FlowError::InvalidTransition(
            "Cannot confirm an unpaid order".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn test_delivery_chain_is_accepted() {
        let chain = [
            (Pending, Confirmed),
            (Confirmed, Preparing),
            (Preparing, Ready),
            (Ready, OnTheWay),
            (OnTheWay, Completed),
        ];
        for (current, target) in chain {
            assert!(
                validate_transition(current, target, PaymentStatus::Paid).is_ok(),
                "{current} -> {target} should be accepted"
            );
        }
    }

    #[test]
    fn test_dine_in_hand_off() {
        assert!(validate_transition(Ready, Delivered, PaymentStatus::Paid).is_ok());
    }

    #[test]
    fn test_unpaid_order_cannot_be_confirmed() {
        let err = validate_transition(Pending, Confirmed, PaymentStatus::Unpaid).unwrap_err();
        assert!(matches!(err, FlowError::InvalidTransition(_)));

        let err = validate_transition(Pending, Confirmed, PaymentStatus::Refunded).unwrap_err();
        assert!(matches!(err, FlowError::InvalidTransition(_)));
    }

    #[test]
    fn test_jumps_are_rejected() {
        for (current, target) in [
            (Pending, Ready),
            (Pending, Preparing),
            (Confirmed, Delivered),
            (Preparing, Completed),
        ] {
            let err = validate_transition(current, target, PaymentStatus::Paid).unwrap_err();
            assert!(
                matches!(err, FlowError::InvalidTransition(_)),
                "{current} -> {target} should be rejected"
            );
        }
    }

    #[test]
    fn test_terminal_states_absorb() {
        for current in [Delivered, Completed, Cancelled] {
            for target in [Pending, Confirmed, Preparing, Ready, Cancelled, Completed] {
                assert!(
                    validate_transition(current, target, PaymentStatus::Paid).is_err(),
                    "{current} -> {target} should be rejected"
                );
            }
        }
    }

    #[test]
    fn test_cancel_from_any_non_terminal() {
        for current in [Pending, Confirmed, Preparing, Ready, OnTheWay] {
            // 取消不看支付状态
            assert!(validate_transition(current, Cancelled, PaymentStatus::Unpaid).is_ok());
            assert!(validate_transition(current, Cancelled, PaymentStatus::Paid).is_ok());
        }
    }

    #[test]
    fn test_self_transition_rejected() {
        let err = validate_transition(Preparing, Preparing, PaymentStatus::Paid).unwrap_err();
        assert!(matches!(err, FlowError::InvalidTransition(_)));
    }
}
