//! Status History Model
//!
//! Append-only ledger rows, one per accepted transition. No update or
//! delete surface exists anywhere in the crate.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::OrderStatus;
use surrealdb::RecordId;

/// One accepted lifecycle transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub order: RecordId,
    /// Status the order arrived at
    pub status: OrderStatus,
    /// None for system-triggered transitions (payment confirmation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Position in the order's ledger, 1-based. Assigned inside the same
    /// transaction as the status write, so it reflects commit order even
    /// when two transitions land in the same millisecond.
    pub seq: u32,
    pub created_at: i64,
}
