//! Domain model vocabulary
//!
//! Closed status enums and actor roles. Wire values are snake_case; unknown
//! strings are rejected at the serde boundary, never stored.

pub mod actor;
pub mod order_status;
pub mod table_status;

pub use actor::{Actor, Role};
pub use order_status::{OrderStatus, PaymentStatus};
pub use table_status::TableStatus;
