//! Order Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::{OrderStatus, PaymentStatus};
use surrealdb::RecordId;

/// One line of an order
///
/// Name and unit price are snapshots taken from the menu at order time so
/// later menu edits never rewrite history. Lines are immutable once the
/// order leaves `pending`; no mutation surface exists after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Menu item record id ("menu_item:key")
    pub menu_item_id: String,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl OrderLine {
    /// Decimal subtotal; stays in `Decimal` until the order total is stored
    pub fn subtotal(&self) -> rust_decimal::Decimal {
        crate::orders::money::line_subtotal(self.unit_price, self.quantity)
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Bound table reference
    #[serde(with = "serde_helpers::record_id")]
    pub table: RecordId,
    /// Denormalized for dashboards and fan-out payloads
    pub table_number: u32,
    /// Opaque diner identity from the gateway
    pub customer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// Exclusive staff claim, empty until someone claims
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
    pub lines: Vec<OrderLine>,
    /// Always recomputed server-side from the lines
    pub total_amount: f64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Record id as the "order:key" string, empty when unsaved.
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

/// Listing filter for dashboards
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilter {
    /// Full record id string ("dining_table:key")
    pub table_id: Option<String>,
    pub customer_id: Option<String>,
    pub staff_id: Option<String>,
    /// Non-terminal orders only
    #[serde(default)]
    pub active: bool,
}
